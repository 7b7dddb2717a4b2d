//! Domain services for the UNI360 admin dashboard.
//!
//! Services describe the operations the admin layer relies on; the
//! persistence crate provides the implementations.

pub mod gateway;

pub use gateway::{
    ApplicationGateway, AppointmentGateway, ChangeEvent, ChangeKind, CommissionGateway,
    DocumentGateway, GatewayError, GatewayResult, PaymentGateway, ResourceGateway,
};
