use std::sync::Arc;
use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use tracing::{error, info, instrument, warn};

use health_monitor_domain::entities::{VitalReading, VitalSubmission};
use health_monitor_domain::services::{parse_submission, VitalsServiceError, VitalsServiceTrait};

use crate::entities::{ErrorResponse, ListVitalsParams, PublicVitalReading, SubmitVitalsForm};
use crate::presentation::{render_error_page, render_page};

/// Largest number of readings the JSON listing returns
pub const MAX_LIST_LIMIT: usize = 100;

/// Service type for dependency injection
pub type VitalsServiceHandle = Arc<dyn VitalsServiceTrait + Send + Sync>;

/// A failed page request, rendered as HTML
#[derive(Debug)]
pub struct PageError {
    status: StatusCode,
    heading: &'static str,
    message: String,
}

impl From<VitalsServiceError> for PageError {
    fn from(err: VitalsServiceError) -> Self {
        match err {
            VitalsServiceError::ValidationError(message) => Self {
                status: StatusCode::BAD_REQUEST,
                heading: "Invalid submission",
                message,
            },
            VitalsServiceError::RepositoryError(_) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                heading: "Something went wrong",
                message: "The reading could not be saved. Please try again.".to_string(),
            },
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        (self.status, Html(render_error_page(self.heading, &self.message))).into_response()
    }
}

/// Read the rows for the records page; a failed read yields an empty table
async fn load_recent(service: &VitalsServiceHandle) -> Vec<VitalReading> {
    match service.recent_readings(service.default_limit()).await {
        Ok(readings) => readings,
        Err(e) => {
            error!("Failed to read recent vitals, rendering empty table: {}", e);
            Vec::new()
        }
    }
}

/// Render the records page
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Records page with submission form", content_type = "text/html", body = String),
    ),
    tag = "vitals"
)]
#[instrument(level = "debug", skip(service))]
pub async fn index(State(service): State<VitalsServiceHandle>) -> Html<String> {
    let readings = load_recent(&service).await;
    Html(render_page(&readings))
}

/// Record a set of vital signs and re-render the records page
#[utoipa::path(
    post,
    path = "/submit",
    request_body(content = SubmitVitalsForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Reading stored; records page re-rendered", content_type = "text/html", body = String),
        (status = 400, description = "A field is missing or not a number", content_type = "text/html", body = String),
        (status = 500, description = "The reading could not be stored", content_type = "text/html", body = String),
    ),
    tag = "vitals"
)]
#[instrument(level = "debug", skip(service, form))]
pub async fn submit(
    State(service): State<VitalsServiceHandle>,
    Form(form): Form<SubmitVitalsForm>,
) -> Result<Html<String>, PageError> {
    let submission: VitalSubmission = form.into();
    let request = parse_submission(&submission).map_err(|e| {
        warn!("Rejected vitals submission: {}", e);
        PageError::from(e)
    })?;

    let reading = service.submit_reading(request).await.map_err(|e| {
        error!("Failed to store vitals submission: {}", e);
        PageError::from(e)
    })?;

    info!(
        patient_name = %reading.patient_name,
        heart_rate = reading.heart_rate,
        blood_pressure = %reading.blood_pressure,
        temperature = reading.temperature,
        status = %reading.status,
        "Patient {} submitted vitals - Status: {}",
        reading.patient_name,
        reading.status,
    );

    let readings = load_recent(&service).await;
    Ok(Html(render_page(&readings)))
}

/// List recent readings as JSON, newest first
#[utoipa::path(
    get,
    path = "/api/v1/vitals",
    params(ListVitalsParams),
    responses(
        (status = 200, description = "Recent readings, newest first", body = [PublicVitalReading]),
        (status = 500, description = "The store could not be read", body = ErrorResponse),
    ),
    tag = "vitals"
)]
#[instrument(level = "debug", skip(service))]
pub async fn list_vitals(
    State(service): State<VitalsServiceHandle>,
    Query(params): Query<ListVitalsParams>,
) -> Result<Json<Vec<PublicVitalReading>>, ErrorResponse> {
    let limit = params
        .limit
        .or(service.default_limit())
        .unwrap_or(MAX_LIST_LIMIT)
        .min(MAX_LIST_LIMIT);

    let readings = service.recent_readings(Some(limit)).await.map_err(|e| {
        error!("Error listing vitals: {}", e);
        ErrorResponse::internal_error()
    })?;

    Ok(Json(readings.into_iter().map(PublicVitalReading::from).collect()))
}
