pub mod handlers;
pub mod routes;
pub mod security;

use std::sync::Arc;
use axum::Router;
use tracing::info;

use health_monitor_data::database::{DatabaseError, DatabasePool};
use health_monitor_data::repository::{StoreBackend, VitalsRepository};
use health_monitor_domain::services::create_default_vitals_service;

use crate::config::AppConfig;
use handlers::VitalsServiceHandle;

/// Build the record store selected by configuration.
///
/// For the durable store this opens the pool and runs migrations.
pub async fn create_repository(config: &AppConfig) -> Result<VitalsRepository, DatabaseError> {
    match config.store_backend {
        StoreBackend::Database => {
            let pool = DatabasePool::connect(&config.database).await?;
            info!("Using durable {} record store", pool.backend_name());
            Ok(VitalsRepository::database(pool))
        },
        StoreBackend::Memory => {
            info!("Using in-memory record store; readings are lost on restart");
            Ok(VitalsRepository::in_memory())
        },
    }
}

/// Create the application router on top of a record store
pub fn create_application(repository: VitalsRepository, recent_limit: usize) -> Router {
    let service: VitalsServiceHandle = Arc::new(create_default_vitals_service(repository, recent_limit));
    routes::create_app(service)
}
