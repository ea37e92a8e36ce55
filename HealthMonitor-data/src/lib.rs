// HealthMonitor Data
// This crate handles storage of vital sign readings

// Database configuration, connection pools and migrations
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
