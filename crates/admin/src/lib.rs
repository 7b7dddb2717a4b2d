pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod services;
