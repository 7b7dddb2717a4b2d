//! Cross-resource services.

pub mod dashboard;

pub use dashboard::DashboardService;
