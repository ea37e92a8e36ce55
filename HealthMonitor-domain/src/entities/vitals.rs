use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Status tier derived from heart rate and temperature
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum VitalStatus {
    /// Heart rate and temperature inside the normal band
    Normal,

    /// Outside the normal band but not critical
    Warning,

    /// Heart rate above 120 bpm or temperature above 103 F
    Critical,
}

impl VitalStatus {
    /// Lowercase name, as stored and used for CSS classes
    pub fn as_str(&self) -> &'static str {
        match self {
            VitalStatus::Normal => "normal",
            VitalStatus::Warning => "warning",
            VitalStatus::Critical => "critical",
        }
    }
}

impl fmt::Display for VitalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VitalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(VitalStatus::Normal),
            "warning" => Ok(VitalStatus::Warning),
            "critical" => Ok(VitalStatus::Critical),
            other => Err(format!("Unknown vital status: {}", other)),
        }
    }
}

/// Domain model for one recorded set of vital signs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalReading {
    /// Store-assigned identifier; absent for the in-memory store
    pub id: Option<i64>,

    /// Patient name, may be empty
    pub patient_name: String,

    /// Heart rate in beats per minute
    pub heart_rate: i32,

    /// Blood pressure as typed, e.g. "120/80"
    pub blood_pressure: String,

    /// Body temperature in degrees Fahrenheit
    pub temperature: f64,

    /// Status computed when the reading was submitted
    pub status: VitalStatus,

    /// Insertion time; absent for the in-memory store
    pub timestamp: Option<DateTime<Utc>>,
}

/// A typed request to record vital signs.
///
/// There is no status field: status is always derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CreateVitalReadingRequest {
    pub patient_name: String,
    pub heart_rate: i32,
    pub blood_pressure: String,
    pub temperature: f64,
}

/// Raw form fields exactly as submitted, before coercion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalSubmission {
    pub patient_name: Option<String>,
    pub heart_rate: Option<String>,
    pub blood_pressure: Option<String>,
    pub temperature: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_text() {
        for status in [VitalStatus::Normal, VitalStatus::Warning, VitalStatus::Critical] {
            assert_eq!(status.as_str().parse::<VitalStatus>().unwrap(), status);
            assert_eq!(status.to_string(), status.as_str());
        }
        assert_eq!("CRITICAL".parse::<VitalStatus>().unwrap(), VitalStatus::Critical);
        assert!("unknown".parse::<VitalStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&VitalStatus::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }
}
