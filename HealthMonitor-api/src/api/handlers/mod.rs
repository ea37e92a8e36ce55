pub mod health;
pub mod vitals;

// Re-export handlers for easier imports
pub use health::health_check;
pub use vitals::{index, list_vitals, submit, VitalsServiceHandle};
