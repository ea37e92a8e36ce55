use crate::entities::vitals::{CreateVitalReadingRequest, VitalReading, VitalStatus};
use health_monitor_data::models::vitals::{NewVitalRecord, VitalRecord};

// Conversion functions between domain entities and data models.
// Names follow the pattern convert_to_[target_layer]_[model_name].

/// Convert from data model to domain entity for a stored reading.
///
/// Fails when the stored status text is not a known tier.
pub fn convert_to_domain_reading(data_reading: VitalRecord) -> Result<VitalReading, String> {
    let status = data_reading.status.parse::<VitalStatus>()?;

    Ok(VitalReading {
        id: data_reading.id,
        patient_name: data_reading.patient_name,
        heart_rate: data_reading.heart_rate,
        blood_pressure: data_reading.blood_pressure,
        temperature: data_reading.temperature,
        status,
        timestamp: data_reading.timestamp,
    })
}

/// Convert a create request plus its derived status into a data model
pub fn convert_to_data_new_record(
    domain_request: &CreateVitalReadingRequest,
    status: VitalStatus,
) -> NewVitalRecord {
    NewVitalRecord {
        patient_name: domain_request.patient_name.clone(),
        heart_rate: domain_request.heart_rate,
        blood_pressure: domain_request.blood_pressure.clone(),
        temperature: domain_request.temperature,
        status: status.as_str().to_string(),
    }
}
