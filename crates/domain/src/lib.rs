//! Domain layer for the UNI360 admin dashboard.
//!
//! This crate contains:
//! - Entity models (User, University, Application, Commission, Payment,
//!   Document, Appointment)
//! - The `Resource` abstraction shared by every list-bearing entity
//! - Gateway service traits and their error type

pub mod models;
pub mod resource;
pub mod services;
