use thiserror::Error;
use tracing::{debug, error};
use async_trait::async_trait;

use crate::entities::conversions;
use crate::entities::vitals::{CreateVitalReadingRequest, VitalReading, VitalSubmission};
use crate::health::{self, SystemHealth};
use crate::services::classifier::classify_vitals;
use health_monitor_data::repository::{StoreBackend, VitalsRepository, VitalsRepositoryTrait, RepositoryError};

/// Vitals service errors
#[derive(Debug, Error)]
pub enum VitalsServiceError {
    /// A submitted field is missing or could not be coerced
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<RepositoryError> for VitalsServiceError {
    fn from(err: RepositoryError) -> Self {
        VitalsServiceError::RepositoryError(err.to_string())
    }
}

/// Coerce raw form fields into a typed request.
///
/// Numeric fields are trimmed before parsing. Text fields are taken as-is
/// and may be empty. A field that is absent altogether is an error.
pub fn parse_submission(submission: &VitalSubmission) -> Result<CreateVitalReadingRequest, VitalsServiceError> {
    let patient_name = required(&submission.patient_name, "patient_name")?;
    let blood_pressure = required(&submission.blood_pressure, "blood_pressure")?;

    let raw_heart_rate = required(&submission.heart_rate, "heart_rate")?;
    let heart_rate = raw_heart_rate.trim().parse::<i32>().map_err(|_| {
        VitalsServiceError::ValidationError(format!(
            "heart_rate must be a whole number, got '{}'",
            raw_heart_rate
        ))
    })?;

    let raw_temperature = required(&submission.temperature, "temperature")?;
    let temperature = raw_temperature.trim().parse::<f64>().map_err(|_| {
        VitalsServiceError::ValidationError(format!(
            "temperature must be a number, got '{}'",
            raw_temperature
        ))
    })?;

    Ok(CreateVitalReadingRequest {
        patient_name: patient_name.to_string(),
        heart_rate,
        blood_pressure: blood_pressure.to_string(),
        temperature,
    })
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, VitalsServiceError> {
    value
        .as_deref()
        .ok_or_else(|| VitalsServiceError::ValidationError(format!("{} is required", field)))
}

fn corrupt_record(reason: String) -> VitalsServiceError {
    error!("Stored vital reading could not be read back: {}", reason);
    RepositoryError::CorruptRecord(reason).into()
}

/// Trait for vitals service operations
#[async_trait]
pub trait VitalsServiceTrait {
    /// Classify and store a reading, returning it as stored
    async fn submit_reading(&self, request: CreateVitalReadingRequest)
        -> Result<VitalReading, VitalsServiceError>;

    /// Most recent readings first, at most `limit` when given
    async fn recent_readings(&self, limit: Option<usize>)
        -> Result<Vec<VitalReading>, VitalsServiceError>;

    /// How many rows the records page shows; `None` means all of them
    fn default_limit(&self) -> Option<usize>;

    /// Probe the record store
    async fn get_system_health(&self) -> SystemHealth;
}

/// Vitals service for domain logic
pub struct VitalsService<R: VitalsRepositoryTrait> {
    repository: R,
    recent_limit: Option<usize>,
}

impl<R: VitalsRepositoryTrait> VitalsService<R> {
    /// Create a new vitals service that shows at most `recent_limit` rows by default
    pub fn new(repository: R, recent_limit: Option<usize>) -> Self {
        Self { repository, recent_limit }
    }
}

#[async_trait]
impl<R: VitalsRepositoryTrait + Send + Sync> VitalsServiceTrait for VitalsService<R> {
    async fn submit_reading(&self, request: CreateVitalReadingRequest)
        -> Result<VitalReading, VitalsServiceError>
    {
        let status = classify_vitals(request.heart_rate, request.temperature);
        debug!("Classified reading for {:?} as {}", request.patient_name, status);

        let data_record = conversions::convert_to_data_new_record(&request, status);
        let stored = self.repository.append(data_record).await.map_err(|e| {
            error!("Failed to store vital reading: {}", e);
            VitalsServiceError::from(e)
        })?;

        conversions::convert_to_domain_reading(stored).map_err(corrupt_record)
    }

    async fn recent_readings(&self, limit: Option<usize>)
        -> Result<Vec<VitalReading>, VitalsServiceError>
    {
        let data_readings = self.repository.recent(limit).await?;

        data_readings
            .into_iter()
            .map(conversions::convert_to_domain_reading)
            .collect::<Result<Vec<_>, _>>()
            .map_err(corrupt_record)
    }

    fn default_limit(&self) -> Option<usize> {
        self.recent_limit
    }

    async fn get_system_health(&self) -> SystemHealth {
        health::get_system_health(&self.repository).await
    }
}

/// Create the default vitals service on top of a repository.
///
/// The durable store shows `recent_limit` rows; the in-memory store shows all.
pub fn create_default_vitals_service(
    repository: VitalsRepository,
    recent_limit: usize,
) -> impl VitalsServiceTrait + Send + Sync {
    let limit = match repository.backend() {
        StoreBackend::Database => Some(recent_limit),
        StoreBackend::Memory => None,
    };
    VitalsService::new(repository, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::vitals::VitalStatus;
    use health_monitor_data::models::vitals::{NewVitalRecord, VitalRecord};
    use health_monitor_data::repository::tests::MockVitalsRepository;
    use mockall::{mock, predicate::eq};

    mock! {
        pub Repo {}

        #[async_trait]
        impl VitalsRepositoryTrait for Repo {
            async fn append(&self, record: NewVitalRecord) -> Result<VitalRecord, RepositoryError>;
            async fn recent(&self, limit: Option<usize>) -> Result<Vec<VitalRecord>, RepositoryError>;
            async fn check_health(&self) -> Result<String, RepositoryError>;
            fn backend(&self) -> StoreBackend;
        }
    }

    fn submission(name: &str, hr: &str, bp: &str, temp: &str) -> VitalSubmission {
        VitalSubmission {
            patient_name: Some(name.to_string()),
            heart_rate: Some(hr.to_string()),
            blood_pressure: Some(bp.to_string()),
            temperature: Some(temp.to_string()),
        }
    }

    fn request(name: &str, heart_rate: i32, temperature: f64) -> CreateVitalReadingRequest {
        CreateVitalReadingRequest {
            patient_name: name.to_string(),
            heart_rate,
            blood_pressure: "120/80".to_string(),
            temperature,
        }
    }

    #[test]
    fn test_parse_submission_trims_numbers() {
        let parsed = parse_submission(&submission("Jane", " 75 ", "120/80", "\t98.6\n")).unwrap();
        assert_eq!(parsed.heart_rate, 75);
        assert_eq!(parsed.temperature, 98.6);
        assert_eq!(parsed.patient_name, "Jane");
        assert_eq!(parsed.blood_pressure, "120/80");
    }

    #[test]
    fn test_parse_submission_keeps_text_unvalidated() {
        let parsed = parse_submission(&submission("", "-3", "not a pressure", "1e2")).unwrap();
        assert_eq!(parsed.patient_name, "");
        assert_eq!(parsed.heart_rate, -3);
        assert_eq!(parsed.blood_pressure, "not a pressure");
        assert_eq!(parsed.temperature, 100.0);
    }

    #[test]
    fn test_parse_submission_rejects_non_numeric_heart_rate() {
        let err = parse_submission(&submission("A", "abc", "120/80", "98.6")).unwrap_err();
        assert!(matches!(err, VitalsServiceError::ValidationError(_)));
        assert!(err.to_string().contains("heart_rate"));
    }

    #[test]
    fn test_parse_submission_rejects_fractional_heart_rate() {
        let err = parse_submission(&submission("A", "72.5", "120/80", "98.6")).unwrap_err();
        assert!(err.to_string().contains("heart_rate"));
    }

    #[test]
    fn test_parse_submission_rejects_bad_temperature() {
        let err = parse_submission(&submission("A", "72", "120/80", "warm")).unwrap_err();
        assert!(err.to_string().contains("temperature"));

        let err = parse_submission(&submission("A", "72", "120/80", "   ")).unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn test_parse_submission_rejects_missing_fields() {
        let mut missing = submission("A", "72", "120/80", "98.6");
        missing.heart_rate = None;
        let err = parse_submission(&missing).unwrap_err();
        assert!(err.to_string().contains("heart_rate is required"));

        let err = parse_submission(&VitalSubmission::default()).unwrap_err();
        assert!(matches!(err, VitalsServiceError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_submit_classifies_before_storing() {
        let mut repo = MockRepo::new();
        repo.expect_append()
            .withf(|record: &NewVitalRecord| record.patient_name == "B" && record.status == "critical")
            .times(1)
            .returning(|record| Ok(record.into_record(Some(1), None)));

        let service = VitalsService::new(repo, Some(20));
        let reading = service.submit_reading(request("B", 130, 101.0)).await.unwrap();

        assert_eq!(reading.status, VitalStatus::Critical);
        assert_eq!(reading.id, Some(1));
    }

    #[tokio::test]
    async fn test_submit_maps_repository_failure() {
        let mut repo = MockRepo::new();
        repo.expect_append()
            .returning(|_| Err(RepositoryError::Unavailable("disk full".to_string())));

        let service = VitalsService::new(repo, Some(20));
        let err = service.submit_reading(request("A", 75, 98.6)).await.unwrap_err();

        assert!(matches!(err, VitalsServiceError::RepositoryError(_)));
        assert!(err.to_string().contains("disk full"));
    }

    #[tokio::test]
    async fn test_recent_passes_limit_through() {
        let mut repo = MockRepo::new();
        repo.expect_recent()
            .with(eq(Some(20)))
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let service = VitalsService::new(repo, Some(20));
        let readings = service.recent_readings(service.default_limit()).await.unwrap();
        assert!(readings.is_empty());
    }

    #[tokio::test]
    async fn test_recent_rejects_corrupt_status() {
        let mut repo = MockRepo::new();
        repo.expect_recent().returning(|_| {
            Ok(vec![VitalRecord {
                id: Some(1),
                patient_name: "A".to_string(),
                heart_rate: 75,
                blood_pressure: "120/80".to_string(),
                temperature: 98.6,
                status: "unknown".to_string(),
                timestamp: None,
            }])
        });

        let service = VitalsService::new(repo, None);
        let err = service.recent_readings(None).await.unwrap_err();
        assert!(matches!(err, VitalsServiceError::RepositoryError(_)));
        assert!(err.to_string().contains("Corrupt record"));
    }

    #[tokio::test]
    async fn test_recent_reads_existing_records_newest_first() {
        let stored = |id: i64, name: &str, status: &str| VitalRecord {
            id: Some(id),
            patient_name: name.to_string(),
            heart_rate: 75,
            blood_pressure: "120/80".to_string(),
            temperature: 98.6,
            status: status.to_string(),
            timestamp: None,
        };
        let repo = MockVitalsRepository::with_records(vec![
            stored(1, "First", "normal"),
            stored(2, "Second", "warning"),
            stored(3, "Third", "critical"),
        ]);

        let service = VitalsService::new(repo, Some(2));
        let readings = service.recent_readings(service.default_limit()).await.unwrap();

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].patient_name, "Third");
        assert_eq!(readings[0].status, VitalStatus::Critical);
        assert_eq!(readings[1].patient_name, "Second");
        assert_eq!(readings[1].status, VitalStatus::Warning);
    }

    #[tokio::test]
    async fn test_submitted_reading_is_first() {
        let service = VitalsService::new(MockVitalsRepository::new(), Some(20));

        service.submit_reading(request("A", 75, 98.6)).await.unwrap();
        service.submit_reading(request("B", 130, 101.0)).await.unwrap();

        let readings = service.recent_readings(Some(20)).await.unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].patient_name, "B");
        assert_eq!(readings[0].status, VitalStatus::Critical);
        assert_eq!(readings[1].patient_name, "A");
        assert_eq!(readings[1].status, VitalStatus::Normal);
    }

    #[tokio::test]
    async fn test_default_service_limit_depends_on_backend() {
        let memory = create_default_vitals_service(VitalsRepository::in_memory(), 20);
        assert_eq!(memory.default_limit(), None);
    }

    #[tokio::test]
    async fn test_health_reports_failing_store() {
        let service = VitalsService::new(MockVitalsRepository::new().with_read_failure(), None);
        let health = service.get_system_health().await;
        assert!(!health.is_healthy());
    }
}
