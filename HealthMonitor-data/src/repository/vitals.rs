use std::fmt;
use std::str::FromStr;
use async_trait::async_trait;
use tracing::debug;

use crate::database::DatabasePool;
use crate::models::vitals::{NewVitalRecord, VitalRecord};
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::DatabaseStorage;

/// Which kind of store backs the repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Relational database, survives restarts
    Database,
    /// Process-local list, lost on restart
    Memory,
}

impl StoreBackend {
    /// Lowercase name used in configuration and health reports
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Database => "database",
            StoreBackend::Memory => "memory",
        }
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "database" | "db" | "durable" => Ok(StoreBackend::Database),
            "memory" | "in-memory" | "ephemeral" => Ok(StoreBackend::Memory),
            other => Err(format!("Unknown store backend: {}", other)),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repository trait for vital signs readings.
///
/// Readings are append-only: there is no update or delete.
#[async_trait]
pub trait VitalsRepositoryTrait {
    /// Append a reading and return it with any store-assigned fields filled in
    async fn append(&self, record: NewVitalRecord) -> Result<VitalRecord, RepositoryError>;

    /// Most recent readings first, at most `limit` of them when given
    async fn recent(&self, limit: Option<usize>) -> Result<Vec<VitalRecord>, RepositoryError>;

    /// Probe the store and describe it
    async fn check_health(&self) -> Result<String, RepositoryError>;

    /// Kind of store behind this repository
    fn backend(&self) -> StoreBackend;
}

/// Repository for vital signs readings.
///
/// Cloning is cheap and every clone shares the same underlying store.
#[derive(Debug, Clone)]
pub enum VitalsRepository {
    /// Durable relational storage
    Database(DatabaseStorage),
    /// Ephemeral in-process storage
    Memory(InMemoryStorage),
}

impl VitalsRepository {
    /// Create a repository on top of an initialized database pool
    pub fn database(pool: DatabasePool) -> Self {
        VitalsRepository::Database(DatabaseStorage::new(pool))
    }

    /// Create a fresh, empty in-memory repository
    pub fn in_memory() -> Self {
        VitalsRepository::Memory(InMemoryStorage::new())
    }
}

#[async_trait]
impl VitalsRepositoryTrait for VitalsRepository {
    async fn append(&self, record: NewVitalRecord) -> Result<VitalRecord, RepositoryError> {
        debug!("Appending vital reading to {} store", self.backend());
        match self {
            VitalsRepository::Database(storage) => storage.append(record).await,
            VitalsRepository::Memory(storage) => storage.append(record).await,
        }
    }

    async fn recent(&self, limit: Option<usize>) -> Result<Vec<VitalRecord>, RepositoryError> {
        debug!("Reading recent vitals from {} store (limit={:?})", self.backend(), limit);
        match self {
            VitalsRepository::Database(storage) => storage.recent(limit).await,
            VitalsRepository::Memory(storage) => storage.recent(limit).await,
        }
    }

    async fn check_health(&self) -> Result<String, RepositoryError> {
        match self {
            VitalsRepository::Database(storage) => storage.check_health().await,
            VitalsRepository::Memory(storage) => storage.check_health().await,
        }
    }

    fn backend(&self) -> StoreBackend {
        match self {
            VitalsRepository::Database(_) => StoreBackend::Database,
            VitalsRepository::Memory(_) => StoreBackend::Memory,
        }
    }
}

/// Mock vitals repository for testing
#[cfg(any(test, feature = "mock"))]
pub mod tests {
    use super::*;
    use std::sync::Mutex;
    use chrono::{Duration, Utc};

    /// Mock implementation of the vitals repository for testing.
    ///
    /// Behaves like a durable store (ids and timestamps are assigned) and can
    /// be told to fail reads or writes.
    #[derive(Debug, Default)]
    pub struct MockVitalsRepository {
        records: Mutex<Vec<VitalRecord>>,
        fail_reads: bool,
        fail_writes: bool,
    }

    impl MockVitalsRepository {
        /// Create a new empty mock repository
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a mock repository with predefined records, oldest first
        pub fn with_records(records: Vec<VitalRecord>) -> Self {
            Self {
                records: Mutex::new(records),
                ..Self::default()
            }
        }

        /// Make every read fail
        pub fn with_read_failure(mut self) -> Self {
            self.fail_reads = true;
            self
        }

        /// Make every append fail
        pub fn with_write_failure(mut self) -> Self {
            self.fail_writes = true;
            self
        }

        /// Number of records held
        pub fn len(&self) -> usize {
            self.records.lock().map(|r| r.len()).unwrap_or(0)
        }

        /// Whether the mock holds no records
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    #[async_trait]
    impl VitalsRepositoryTrait for MockVitalsRepository {
        async fn append(&self, record: NewVitalRecord) -> Result<VitalRecord, RepositoryError> {
            if self.fail_writes {
                return Err(RepositoryError::Unavailable("mock is configured to fail writes".to_string()));
            }

            let mut records = self.records.lock()?;
            let id = records.len() as i64 + 1;
            // Keep timestamps strictly increasing even when appends land in the same instant
            let timestamp = records
                .last()
                .and_then(|r| r.timestamp)
                .map(|last| (last + Duration::microseconds(1)).max(Utc::now()))
                .unwrap_or_else(Utc::now);
            let stored = record.into_record(Some(id), Some(timestamp));
            records.push(stored.clone());
            Ok(stored)
        }

        async fn recent(&self, limit: Option<usize>) -> Result<Vec<VitalRecord>, RepositoryError> {
            if self.fail_reads {
                return Err(RepositoryError::Unavailable("mock is configured to fail reads".to_string()));
            }

            let records = self.records.lock()?;
            Ok(records
                .iter()
                .rev()
                .take(limit.unwrap_or(usize::MAX))
                .cloned()
                .collect())
        }

        async fn check_health(&self) -> Result<String, RepositoryError> {
            if self.fail_reads {
                return Err(RepositoryError::Unavailable("mock is configured to fail reads".to_string()));
            }
            Ok("mock store".to_string())
        }

        fn backend(&self) -> StoreBackend {
            StoreBackend::Database
        }
    }
}

#[cfg(test)]
mod repository_tests {
    use super::*;
    use super::tests::MockVitalsRepository;

    fn new_record(name: &str, status: &str) -> NewVitalRecord {
        NewVitalRecord {
            patient_name: name.to_string(),
            heart_rate: 75,
            blood_pressure: "120/80".to_string(),
            temperature: 98.6,
            status: status.to_string(),
        }
    }

    #[test]
    fn test_store_backend_from_str() {
        assert_eq!("database".parse::<StoreBackend>().unwrap(), StoreBackend::Database);
        assert_eq!("Memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!("redis".parse::<StoreBackend>().is_err());
    }

    #[tokio::test]
    async fn test_in_memory_repository_dispatch() {
        let repo = VitalsRepository::in_memory();
        assert_eq!(repo.backend(), StoreBackend::Memory);

        repo.append(new_record("A", "normal")).await.unwrap();
        repo.append(new_record("B", "warning")).await.unwrap();

        let recent = repo.recent(None).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].patient_name, "B");
        assert!(repo.check_health().await.is_ok());
    }

    #[tokio::test]
    async fn test_repository_clones_share_storage() {
        let repo = VitalsRepository::in_memory();
        let clone = repo.clone();

        clone.append(new_record("A", "normal")).await.unwrap();

        assert_eq!(repo.recent(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_assigns_increasing_ids_and_timestamps() {
        let repo = MockVitalsRepository::new();
        let first = repo.append(new_record("A", "normal")).await.unwrap();
        let second = repo.append(new_record("B", "normal")).await.unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert!(second.timestamp > first.timestamp);
        assert_eq!(repo.recent(Some(1)).await.unwrap()[0].patient_name, "B");
    }

    #[tokio::test]
    async fn test_mock_failures() {
        let repo = MockVitalsRepository::new().with_read_failure().with_write_failure();
        assert!(repo.append(new_record("A", "normal")).await.is_err());
        assert!(repo.recent(None).await.is_err());
        assert!(repo.check_health().await.is_err());
        assert!(repo.is_empty());
    }
}
