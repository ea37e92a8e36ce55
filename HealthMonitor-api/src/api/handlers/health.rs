use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use utoipa::ToSchema;
use std::sync::Once;
use std::time::{SystemTime, UNIX_EPOCH};
use once_cell::sync::OnceCell;

use health_monitor_domain::health::{ComponentStatus, SystemStatus};

use super::vitals::VitalsServiceHandle;

/// Health check response model
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Overall service status ("ok" or "error")
    pub status: String,
    /// Current application version from Cargo manifest
    pub version: String,
    /// Unix timestamp of when the response was generated
    pub timestamp: u64,
    /// Uptime of the service in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    /// Record store status
    pub store: StoreHealthStatus,
}

/// Health of the record store
#[derive(Serialize, Deserialize, ToSchema)]
pub struct StoreHealthStatus {
    /// Store kind ("database" or "memory")
    pub backend: String,
    /// Status of the store ("ok" or "error")
    pub status: String,
    /// Probe output or failure reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// Track the time when the server started using a thread-safe OnceCell
static SERVER_START_TIME: OnceCell<u64> = OnceCell::new();
static INIT: Once = Once::new();

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Initialize the server start time
pub fn initialize_server_start_time() {
    INIT.call_once(|| {
        let _ = SERVER_START_TIME.set(unix_now());
    });
}

/// Health check endpoint reporting the state of the record store
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and store are healthy", body = HealthResponse),
        (status = 503, description = "The record store is unavailable", body = HealthResponse)
    ),
    tag = "health"
)]
#[instrument(level = "debug", skip(service))]
pub async fn health_check(State(service): State<VitalsServiceHandle>) -> impl IntoResponse {
    debug!("Health check requested");

    let now = unix_now();
    let uptime = SERVER_START_TIME.get().map(|&start_time| now.saturating_sub(start_time));

    let system_health = service.get_system_health().await;

    let overall_status = match system_health.status {
        SystemStatus::Healthy => "ok",
        SystemStatus::Unhealthy => "error",
    };

    let response = HealthResponse {
        status: overall_status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: now,
        uptime,
        store: StoreHealthStatus {
            backend: system_health.store_backend.as_str().to_string(),
            status: map_component_status(system_health.store.status),
            message: system_health.store.details,
        },
    };

    if system_health.status == SystemStatus::Healthy {
        (StatusCode::OK, Json(response))
    } else {
        warn!("Health check failed: record store is unavailable");
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Map domain component status to API status string
fn map_component_status(status: ComponentStatus) -> String {
    match status {
        ComponentStatus::Healthy => "ok",
        ComponentStatus::Unhealthy => "error",
    }.to_string()
}
