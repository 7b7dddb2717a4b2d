//! Persistence layer for the UNI360 admin dashboard.
//!
//! This crate contains:
//! - In-memory fixture stores with change notification
//! - Seed fixtures for every resource
//! - Gateway implementations with simulated latency
//! - Gateway metrics

pub mod fixtures;
pub mod latency;
pub mod metrics;
pub mod repositories;
pub mod store;

pub use fixtures::{FixtureError, FixtureSet};
pub use latency::{LatencyConfig, Operation};
pub use repositories::FixtureGateway;
pub use store::FixtureStore;
