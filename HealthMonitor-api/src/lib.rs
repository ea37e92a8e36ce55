// HealthMonitor-api lib.rs
//
// This is the main library file for the HealthMonitor web application.
// It re-exports the APIs from the various modules.

// Public modules
pub mod api;
pub mod config;
pub mod entities;
pub mod openapi;
pub mod presentation;

pub use api::{create_application, create_repository};
pub use config::AppConfig;
