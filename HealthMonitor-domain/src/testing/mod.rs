// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

// Re-export useful test mocks from the data layer
pub use health_monitor_data::repository::tests::MockVitalsRepository;

use std::sync::RwLock;
use async_trait::async_trait;
use chrono::Utc;

use crate::entities::vitals::{CreateVitalReadingRequest, VitalReading};
use crate::health::{ComponentStatus, HealthComponent, SystemHealth, SystemStatus};
use crate::services::classifier::classify_vitals;
use crate::services::vitals::{VitalsServiceError, VitalsServiceTrait};
use health_monitor_data::repository::StoreBackend;

/// Mock implementation of the VitalsServiceTrait for testing.
///
/// Classifies like the real service and keeps readings in a list. Each kind
/// of failure can be switched on separately.
#[derive(Debug)]
pub struct MockVitalsService {
    readings: RwLock<Vec<VitalReading>>,
    default_limit: Option<usize>,
    should_fail_reads: bool,
    should_fail_writes: bool,
    unhealthy_store: bool,
}

impl Default for MockVitalsService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockVitalsService {
    /// Create a new mock vitals service with no readings and no limit
    pub fn new() -> Self {
        Self {
            readings: RwLock::new(Vec::new()),
            default_limit: None,
            should_fail_reads: false,
            should_fail_writes: false,
            unhealthy_store: false,
        }
    }

    /// Configure the mock to fail every read
    pub fn with_read_failure(mut self) -> Self {
        self.should_fail_reads = true;
        self
    }

    /// Configure the mock to fail every submission at the storage step
    pub fn with_write_failure(mut self) -> Self {
        self.should_fail_writes = true;
        self
    }

    /// Configure the mock to report a failing store from its health probe
    pub fn with_unhealthy_store(mut self) -> Self {
        self.unhealthy_store = true;
        self
    }

    /// Set the number of rows returned by default
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = Some(limit);
        self
    }

    /// Add pre-defined readings to the mock, oldest first
    pub fn with_readings(self, readings: Vec<VitalReading>) -> Self {
        if let Ok(mut stored) = self.readings.write() {
            stored.extend(readings);
        }
        self
    }
}

#[async_trait]
impl VitalsServiceTrait for MockVitalsService {
    async fn submit_reading(&self, request: CreateVitalReadingRequest)
        -> Result<VitalReading, VitalsServiceError>
    {
        if self.should_fail_writes {
            return Err(VitalsServiceError::RepositoryError(
                "Repository error - mock is configured to fail writes".to_string(),
            ));
        }

        let mut readings = self.readings.write()
            .map_err(|e| VitalsServiceError::RepositoryError(e.to_string()))?;

        let reading = VitalReading {
            id: Some(readings.len() as i64 + 1),
            status: classify_vitals(request.heart_rate, request.temperature),
            patient_name: request.patient_name,
            heart_rate: request.heart_rate,
            blood_pressure: request.blood_pressure,
            temperature: request.temperature,
            timestamp: Some(Utc::now()),
        };
        readings.push(reading.clone());

        Ok(reading)
    }

    async fn recent_readings(&self, limit: Option<usize>)
        -> Result<Vec<VitalReading>, VitalsServiceError>
    {
        if self.should_fail_reads {
            return Err(VitalsServiceError::RepositoryError(
                "Repository error - mock is configured to fail reads".to_string(),
            ));
        }

        let readings = self.readings.read()
            .map_err(|e| VitalsServiceError::RepositoryError(e.to_string()))?;

        Ok(readings
            .iter()
            .rev()
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    fn default_limit(&self) -> Option<usize> {
        self.default_limit
    }

    async fn get_system_health(&self) -> SystemHealth {
        if self.unhealthy_store {
            SystemHealth {
                status: SystemStatus::Unhealthy,
                store_backend: StoreBackend::Memory,
                store: HealthComponent {
                    status: ComponentStatus::Unhealthy,
                    details: Some("Store connection failed".to_string()),
                },
            }
        } else {
            SystemHealth {
                status: SystemStatus::Healthy,
                store_backend: StoreBackend::Memory,
                store: HealthComponent {
                    status: ComponentStatus::Healthy,
                    details: Some("mock store".to_string()),
                },
            }
        }
    }
}
