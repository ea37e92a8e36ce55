use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Vitals endpoints
        crate::api::handlers::vitals::index,
        crate::api::handlers::vitals::submit,
        crate::api::handlers::vitals::list_vitals,
    ),
    components(
        schemas(
            // Entities
            crate::entities::vitals::PublicVitalReading,
            crate::entities::vitals::SubmitVitalsForm,
            crate::entities::vitals::ListVitalsParams,
            crate::entities::common::ErrorResponse,
            health_monitor_domain::entities::VitalStatus,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::StoreHealthStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "vitals", description = "Vital signs submission and records")
    ),
    info(
        title = "HealthMonitor API",
        version = "0.1.0",
        description = "Records patient vital signs and classifies each reading as normal, warning or critical",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_doc_generation() {
        let openapi = ApiDoc::openapi();

        assert_eq!(openapi.info.title, "HealthMonitor API");
        assert_eq!(openapi.info.version, "0.1.0");

        let tags = openapi.tags.as_ref().unwrap();
        assert!(tags.iter().any(|tag| tag.name == "health"));
        assert!(tags.iter().any(|tag| tag.name == "vitals"));

        for path in ["/", "/submit", "/health", "/api/v1/vitals"] {
            assert!(openapi.paths.paths.contains_key(path), "missing path {}", path);
        }
    }

    #[test]
    fn test_schemas_registered() {
        let openapi = ApiDoc::openapi();
        let schemas = &openapi.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("PublicVitalReading"));
        assert!(schemas.contains_key("VitalStatus"));
        assert!(schemas.contains_key("HealthResponse"));
    }
}
