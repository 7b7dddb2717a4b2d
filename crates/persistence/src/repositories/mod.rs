//! Gateway implementations over the fixture stores.

pub mod application;
pub mod appointment;
pub mod commission;
pub mod document;
pub mod fixture;
pub mod payment;

pub use fixture::FixtureGateway;
