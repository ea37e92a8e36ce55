pub mod classifier;
pub mod vitals;

// Domain services
// This module contains business logic implementations.

// Re-export service traits and factory functions
pub use classifier::classify_vitals;
pub use vitals::{
    create_default_vitals_service, parse_submission, VitalsService, VitalsServiceError, VitalsServiceTrait,
};
