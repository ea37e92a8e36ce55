use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::api::handlers::{health, vitals, VitalsServiceHandle};
use crate::api::security::configure_security_headers;
use crate::openapi::configure_swagger_routes;

/// Create the application router around a vitals service
pub fn create_app(service: VitalsServiceHandle) -> Router {
    debug!("Creating application router");

    // Records page and form target
    let page_routes = Router::new()
        .route("/", get(vitals::index))
        .route("/submit", post(vitals::submit));

    // JSON API
    let api_routes = Router::new()
        .route("/vitals", get(vitals::list_vitals));

    let app = Router::new()
        .merge(page_routes)
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_routes)
        .with_state(service);

    debug!("Application routes configured");

    let app = add_swagger_ui(app);
    debug!("Swagger UI merged");

    let app = configure_security_headers(app).layer(TraceLayer::new_for_http());
    debug!("Security headers and request tracing applied");

    health::initialize_server_start_time();

    app
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    app.merge(configure_swagger_routes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use health_monitor_domain::testing::MockVitalsService;
    use tower::ServiceExt;

    fn test_app() -> Router {
        create_app(Arc::new(MockVitalsService::new()))
    }

    #[tokio::test]
    async fn test_routes_respond() {
        for uri in ["/", "/health", "/api/v1/vitals", "/api-docs/openapi.json"] {
            let response = test_app()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
        }
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = test_app()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_submit_requires_post() {
        let response = test_app()
            .oneshot(Request::builder().uri("/submit").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_security_headers_present() {
        let response = test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
        assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY));
    }
}
