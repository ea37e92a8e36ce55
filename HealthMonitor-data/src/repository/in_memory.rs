use std::sync::{Arc, Mutex};

use crate::models::vitals::{NewVitalRecord, VitalRecord};
use super::errors::RepositoryError;

/// In-memory storage for vital readings.
///
/// Readings live in insertion order and are lost when the process exits.
/// No id or timestamp is assigned. Clones share the same list.
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    readings: Arc<Mutex<Vec<VitalRecord>>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create a new, empty in-memory storage
    pub fn new() -> Self {
        Self {
            readings: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Append a reading to the end of the list
    pub async fn append(&self, record: NewVitalRecord) -> Result<VitalRecord, RepositoryError> {
        let stored = record.into_record(None, None);
        let mut store = self.readings.lock()?;
        store.push(stored.clone());
        Ok(stored)
    }

    /// Readings in reverse insertion order, truncated to `limit` when given
    pub async fn recent(&self, limit: Option<usize>) -> Result<Vec<VitalRecord>, RepositoryError> {
        let store = self.readings.lock()?;
        let readings = store
            .iter()
            .rev()
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(readings)
    }

    /// Describe the storage; fails only if the lock is poisoned
    pub async fn check_health(&self) -> Result<String, RepositoryError> {
        let store = self.readings.lock()?;
        Ok(format!("In-memory store holding {} readings", store.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(name: &str) -> NewVitalRecord {
        NewVitalRecord {
            patient_name: name.to_string(),
            heart_rate: 72,
            blood_pressure: "118/76".to_string(),
            temperature: 98.4,
            status: "normal".to_string(),
        }
    }

    #[tokio::test]
    async fn test_poisoned_lock_is_an_error() {
        let storage = InMemoryStorage::new();
        storage.append(reading("Before")).await.unwrap();

        let readings = Arc::clone(&storage.readings);
        let result = std::thread::spawn(move || {
            let _held = readings.lock().unwrap();
            panic!("writer died while holding the lock");
        })
        .join();
        assert!(result.is_err());

        assert!(matches!(storage.append(reading("After")).await, Err(RepositoryError::Lock(_))));
        assert!(matches!(storage.recent(None).await, Err(RepositoryError::Lock(_))));
        assert!(matches!(storage.check_health().await, Err(RepositoryError::Lock(_))));
    }

    #[tokio::test]
    async fn test_empty_storage() {
        let storage = InMemoryStorage::new();
        assert!(storage.recent(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_keeps_fields_and_assigns_nothing() {
        let storage = InMemoryStorage::new();
        let stored = storage.append(reading("Jane")).await.unwrap();

        assert_eq!(stored.patient_name, "Jane");
        assert_eq!(stored.id, None);
        assert_eq!(stored.timestamp, None);
    }

    #[tokio::test]
    async fn test_recent_is_reverse_insertion_order() {
        let storage = InMemoryStorage::new();
        for name in ["first", "second", "third"] {
            storage.append(reading(name)).await.unwrap();
        }

        let names: Vec<String> = storage
            .recent(None)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.patient_name)
            .collect();
        assert_eq!(names, vec!["third", "second", "first"]);

        let limited = storage.recent(Some(2)).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].patient_name, "third");
    }

    #[tokio::test]
    async fn test_separate_instances_are_isolated() {
        let a = InMemoryStorage::new();
        let b = InMemoryStorage::new();
        a.append(reading("only-a")).await.unwrap();

        assert_eq!(a.recent(None).await.unwrap().len(), 1);
        assert!(b.recent(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicates_are_kept() {
        let storage = InMemoryStorage::new();
        storage.append(reading("Same")).await.unwrap();
        storage.append(reading("Same")).await.unwrap();
        assert_eq!(storage.recent(None).await.unwrap().len(), 2);
    }
}
