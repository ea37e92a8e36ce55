use tracing::debug;

use crate::database::DatabasePool;
use crate::models::vitals::{NewVitalRecord, VitalRecord};
use super::errors::RepositoryError;

#[cfg(feature = "sqlite")]
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};

/// NaN has no SQLite representation and is written as NULL, which reads back as NaN
#[cfg(feature = "sqlite")]
fn sqlite_temperature(temperature: f64) -> Option<f64> {
    if temperature.is_nan() {
        None
    } else {
        Some(temperature)
    }
}

/// Durable storage for vital readings backed by a pooled database connection.
///
/// Each operation checks out one connection and returns it when done.
#[derive(Debug, Clone)]
pub struct DatabaseStorage {
    pool: DatabasePool,
}

impl DatabaseStorage {
    /// Wrap an initialized and migrated pool
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Insert a reading; the database assigns id and timestamp
    pub async fn append(&self, record: NewVitalRecord) -> Result<VitalRecord, RepositoryError> {
        debug!("Storing vital reading in database: patient={}", record.patient_name);

        match &self.pool {
            #[cfg(feature = "sqlite")]
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;
                let timestamp = Utc::now().trunc_subsecs(6);

                conn.execute(
                    "INSERT INTO vitals
                     (patient_name, heart_rate, blood_pressure, temperature, status, timestamp)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    rusqlite::params![
                        &record.patient_name,
                        record.heart_rate,
                        &record.blood_pressure,
                        sqlite_temperature(record.temperature),
                        &record.status,
                        // Fixed-width UTC text sorts the same as the instant it encodes
                        timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
                    ],
                )?;

                let id = conn.last_insert_rowid();
                Ok(record.into_record(Some(id), Some(timestamp)))
            },

            #[cfg(feature = "postgres")]
            DatabasePool::PostgreSQL(pool) => {
                let client = pool.get().await?;

                let row = client.query_one(
                    "INSERT INTO vitals
                     (patient_name, heart_rate, blood_pressure, temperature, status)
                     VALUES ($1, $2, $3, $4, $5)
                     RETURNING id, timestamp",
                    &[
                        &record.patient_name,
                        &record.heart_rate,
                        &record.blood_pressure,
                        &record.temperature,
                        &record.status,
                    ],
                ).await?;

                let id = row.get::<_, i32>(0) as i64;
                let timestamp = row.get(1);
                Ok(record.into_record(Some(id), Some(timestamp)))
            },
        }
    }

    /// Newest readings first, ties broken by descending id
    pub async fn recent(&self, limit: Option<usize>) -> Result<Vec<VitalRecord>, RepositoryError> {
        debug!("Getting recent vital readings from database: limit={:?}", limit);

        let limit = limit.map(|l| i64::try_from(l).unwrap_or(i64::MAX));

        match &self.pool {
            #[cfg(feature = "sqlite")]
            DatabasePool::SQLite(pool) => {
                let conn = pool.get()?;

                let mut stmt = conn.prepare(
                    "SELECT id, patient_name, heart_rate, blood_pressure, temperature, status, timestamp
                     FROM vitals ORDER BY timestamp DESC, id DESC LIMIT ?1"
                )?;

                // A negative LIMIT means no limit in SQLite
                let readings = stmt.query_map([limit.unwrap_or(-1)], |row| {
                    let raw: String = row.get(6)?;
                    let timestamp = DateTime::parse_from_rfc3339(&raw)
                        .map(|ts| ts.with_timezone(&Utc))
                        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(
                            6,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        ))?;

                    Ok(VitalRecord {
                        id: Some(row.get(0)?),
                        patient_name: row.get(1)?,
                        heart_rate: row.get(2)?,
                        blood_pressure: row.get(3)?,
                        temperature: row.get::<_, Option<f64>>(4)?.unwrap_or(f64::NAN),
                        status: row.get(5)?,
                        timestamp: Some(timestamp),
                    })
                })?;

                let mut result = Vec::new();
                for reading in readings {
                    result.push(reading?);
                }

                Ok(result)
            },

            #[cfg(feature = "postgres")]
            DatabasePool::PostgreSQL(pool) => {
                let client = pool.get().await?;

                // LIMIT NULL means no limit in PostgreSQL
                let rows = client.query(
                    "SELECT id, patient_name, heart_rate, blood_pressure, temperature, status, timestamp
                     FROM vitals ORDER BY timestamp DESC, id DESC LIMIT $1",
                    &[&limit],
                ).await?;

                let mut result = Vec::with_capacity(rows.len());
                for row in rows {
                    result.push(VitalRecord {
                        id: Some(row.try_get::<_, i32>(0)? as i64),
                        patient_name: row.try_get(1)?,
                        heart_rate: row.try_get(2)?,
                        blood_pressure: row.try_get(3)?,
                        temperature: row.try_get(4)?,
                        status: row.try_get(5)?,
                        timestamp: Some(row.try_get(6)?),
                    });
                }

                Ok(result)
            },
        }
    }

    /// Probe the database
    pub async fn check_health(&self) -> Result<String, RepositoryError> {
        Ok(self.pool.connection_info().await?)
    }
}
