// HealthMonitor Domain
// This crate contains the business logic for the HealthMonitor application

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Health checks and system status
pub mod health;

// Re-export the data layer's store types for convenience
pub use health_monitor_data::database;
pub use health_monitor_data::repository::{StoreBackend, VitalsRepository};

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
