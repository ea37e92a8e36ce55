use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Storage model for a vital signs reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalRecord {
    /// Row identifier, assigned by durable stores only
    pub id: Option<i64>,

    /// Patient name as submitted
    pub patient_name: String,

    /// Heart rate in beats per minute
    pub heart_rate: i32,

    /// Free-form blood pressure text (e.g. "120/80")
    pub blood_pressure: String,

    /// Body temperature in degrees Fahrenheit
    pub temperature: f64,

    /// Status tier stored as lowercase text
    pub status: String,

    /// Insertion time, assigned by durable stores only
    pub timestamp: Option<DateTime<Utc>>,
}

/// Input data for appending a new vital signs reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVitalRecord {
    /// Patient name as submitted
    pub patient_name: String,

    /// Heart rate in beats per minute
    pub heart_rate: i32,

    /// Free-form blood pressure text
    pub blood_pressure: String,

    /// Body temperature in degrees Fahrenheit
    pub temperature: f64,

    /// Status tier computed before insertion
    pub status: String,
}

impl NewVitalRecord {
    /// Turn the request into a stored record with the given store-assigned fields
    pub fn into_record(self, id: Option<i64>, timestamp: Option<DateTime<Utc>>) -> VitalRecord {
        VitalRecord {
            id,
            patient_name: self.patient_name,
            heart_rate: self.heart_rate,
            blood_pressure: self.blood_pressure,
            temperature: self.temperature,
            status: self.status,
            timestamp,
        }
    }
}
