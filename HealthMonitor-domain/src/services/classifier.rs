//! Status classification for a set of vital signs.
//!
//! Every threshold is exclusive: a value equal to a bound stays on the lower
//! tier. No range checking is done, so negative heart rates and extreme
//! temperatures go through the same comparisons. A NaN temperature compares
//! false everywhere and the result is decided by heart rate alone.

use crate::entities::vitals::VitalStatus;

/// Heart rate below this is abnormal (bpm)
pub const HEART_RATE_LOW: i32 = 60;

/// Heart rate above this is abnormal (bpm)
pub const HEART_RATE_HIGH: i32 = 100;

/// Heart rate above this is critical (bpm)
pub const HEART_RATE_CRITICAL: i32 = 120;

/// Temperature above this is abnormal (F)
pub const TEMPERATURE_HIGH: f64 = 99.5;

/// Temperature above this is critical (F)
pub const TEMPERATURE_CRITICAL: f64 = 103.0;

/// Classify a reading, checking the critical tier first
pub fn classify_vitals(heart_rate: i32, temperature: f64) -> VitalStatus {
    if heart_rate > HEART_RATE_CRITICAL || temperature > TEMPERATURE_CRITICAL {
        VitalStatus::Critical
    } else if heart_rate < HEART_RATE_LOW
        || heart_rate > HEART_RATE_HIGH
        || temperature > TEMPERATURE_HIGH
    {
        VitalStatus::Warning
    } else {
        VitalStatus::Normal
    }
}
