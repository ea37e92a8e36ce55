// Public entities for the HealthMonitor API
// This module contains data structures that are shared across the application boundary

// Vital sign readings and the submission form
pub mod vitals;

// Common entities for error handling
pub mod common;

pub use common::ErrorResponse;
pub use vitals::{ListVitalsParams, PublicVitalReading, SubmitVitalsForm};
