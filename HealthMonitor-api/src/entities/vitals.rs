use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use health_monitor_domain::entities::{VitalReading, VitalStatus, VitalSubmission};

/// A recorded set of vital signs as exposed by the JSON API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicVitalReading {
    /// Identifier assigned by the durable store; null for the in-memory store
    pub id: Option<i64>,

    /// Patient name as submitted
    pub patient_name: String,

    /// Heart rate in beats per minute
    pub heart_rate: i32,

    /// Blood pressure as submitted, e.g. "120/80"
    pub blood_pressure: String,

    /// Body temperature in degrees Fahrenheit
    pub temperature: f64,

    /// Status tier computed at submission time
    pub status: VitalStatus,

    /// When the reading was stored; null for the in-memory store
    pub recorded_at: Option<DateTime<Utc>>,
}

impl From<VitalReading> for PublicVitalReading {
    fn from(reading: VitalReading) -> Self {
        Self {
            id: reading.id,
            patient_name: reading.patient_name,
            heart_rate: reading.heart_rate,
            blood_pressure: reading.blood_pressure,
            temperature: reading.temperature,
            status: reading.status,
            recorded_at: reading.timestamp,
        }
    }
}

/// Form-encoded body of `POST /submit`.
///
/// Every field is optional here so that coercion errors can be reported
/// field by field instead of as a generic rejection.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SubmitVitalsForm {
    /// Patient name
    pub patient_name: Option<String>,

    /// Heart rate, parsed as a whole number
    #[schema(example = "75")]
    pub heart_rate: Option<String>,

    /// Blood pressure text
    #[schema(example = "120/80")]
    pub blood_pressure: Option<String>,

    /// Temperature in degrees Fahrenheit, parsed as a number
    #[schema(example = "98.6")]
    pub temperature: Option<String>,
}

impl From<SubmitVitalsForm> for VitalSubmission {
    fn from(form: SubmitVitalsForm) -> Self {
        Self {
            patient_name: form.patient_name,
            heart_rate: form.heart_rate,
            blood_pressure: form.blood_pressure,
            temperature: form.temperature,
        }
    }
}

/// Query parameters for listing recent readings
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListVitalsParams {
    /// Maximum number of readings to return (capped at 100)
    pub limit: Option<usize>,
}
