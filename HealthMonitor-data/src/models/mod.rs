// Storage models
pub mod vitals;
