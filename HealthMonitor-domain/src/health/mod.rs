//! Domain layer health check functionality
//! This module probes the record store and summarizes system status

use health_monitor_data::repository::{StoreBackend, VitalsRepositoryTrait};
use tracing::warn;

/// System health status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentStatus {
    /// Component answered its probe
    Healthy,
    /// Component failed its probe
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    /// Status of the component
    pub status: ComponentStatus,
    /// Probe output or failure reason
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    /// Overall system status
    pub status: SystemStatus,
    /// Which kind of record store is in use
    pub store_backend: StoreBackend,
    /// Health of the record store
    pub store: HealthComponent,
}

impl SystemHealth {
    /// Whether every component is healthy
    pub fn is_healthy(&self) -> bool {
        self.status == SystemStatus::Healthy
    }
}

/// Probe the record store
pub async fn check_store_status<R>(repository: &R) -> HealthComponent
where
    R: VitalsRepositoryTrait + Sync + ?Sized,
{
    match repository.check_health().await {
        Ok(info) => HealthComponent {
            status: ComponentStatus::Healthy,
            details: Some(info),
        },
        Err(e) => {
            warn!("Record store health probe failed: {}", e);
            HealthComponent {
                status: ComponentStatus::Unhealthy,
                details: Some(e.to_string()),
            }
        },
    }
}

/// Get overall system health
pub async fn get_system_health<R>(repository: &R) -> SystemHealth
where
    R: VitalsRepositoryTrait + Sync + ?Sized,
{
    let store = check_store_status(repository).await;

    let status = if store.status == ComponentStatus::Healthy {
        SystemStatus::Healthy
    } else {
        SystemStatus::Unhealthy
    };

    SystemHealth {
        status,
        store_backend: repository.backend(),
        store,
    }
}
