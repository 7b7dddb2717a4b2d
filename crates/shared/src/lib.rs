//! Shared utilities and common types for the UNI360 admin workspace.
//!
//! This crate provides functionality used across the other crates:
//! - Page-number pagination arithmetic
//! - Common field validation logic

pub mod pagination;
pub mod validation;
