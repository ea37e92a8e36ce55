// Repository module structure
pub mod errors;
mod vitals;
mod in_memory;
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use vitals::{StoreBackend, VitalsRepository, VitalsRepositoryTrait};
pub use in_memory::InMemoryStorage;
pub use storage::DatabaseStorage;

// Re-export test modules for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub use vitals::tests;
