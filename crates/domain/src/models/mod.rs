//! Domain models for the UNI360 admin dashboard.

pub mod application;
pub mod appointment;
pub mod commission;
pub mod dashboard;
pub mod document;
pub mod payment;
pub mod university;
pub mod user;

pub use application::{Application, ApplicationStatus};
pub use appointment::{Appointment, AppointmentKind, AppointmentStatus};
pub use commission::{Commission, CommissionStatus};
pub use dashboard::{ConversionFunnel, DashboardOverview};
pub use document::{Document, DocumentKind, DocumentStatus};
pub use payment::{Payment, PaymentKind, PaymentStatus};
pub use university::University;
pub use user::{AccountStatus, User, UserRole};
