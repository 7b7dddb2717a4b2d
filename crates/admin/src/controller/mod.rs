//! Resource list controllers.

pub mod application;
pub mod appointment;
pub mod commission;
pub mod document;
pub mod list;
pub mod payment;
pub mod state;

pub use application::ApplicationListController;
pub use appointment::AppointmentListController;
pub use commission::CommissionListController;
pub use document::DocumentListController;
pub use list::{LoadOutcome, ResourceListController};
pub use payment::PaymentListController;
pub use state::{ListState, ListView, Phase};

use domain::models::{University, User};

pub type UserListController = ResourceListController<User>;
pub type UniversityListController = ResourceListController<University>;
