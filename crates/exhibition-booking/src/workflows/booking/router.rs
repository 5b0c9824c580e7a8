use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::admission::AdmissionError;
use super::domain::{BookingCandidate, BookingId, BookingStatus};
use super::export::EXPORT_FILE_NAME;
use super::query::BookingFilter;
use super::service::{BookingAdmissionService, BookingServiceError};
use super::store::BookingStore;

/// Router builder exposing the booking endpoints.
pub fn booking_router<S>(service: Arc<BookingAdmissionService<S>>) -> Router
where
    S: BookingStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/bookings",
            post(admit_handler::<S>).get(list_handler::<S>),
        )
        .route("/api/v1/bookings/stats", get(stats_handler::<S>))
        .route("/api/v1/bookings/export.csv", get(export_handler::<S>))
        .route(
            "/api/v1/bookings/:booking_id",
            get(show_handler::<S>).delete(delete_handler::<S>),
        )
        .route(
            "/api/v1/bookings/:booking_id/confirmation",
            get(confirmation_handler::<S>),
        )
        .route(
            "/api/v1/bookings/:booking_id/status",
            patch(status_handler::<S>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: BookingStatus,
}

pub(crate) async fn admit_handler<S>(
    State(service): State<Arc<BookingAdmissionService<S>>>,
    Json(candidate): Json<BookingCandidate>,
) -> Response
where
    S: BookingStore + 'static,
{
    match off_runtime(service, move |service| service.admit(&candidate)).await {
        Ok(booking) => (StatusCode::CREATED, Json(booking)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn list_handler<S>(
    State(service): State<Arc<BookingAdmissionService<S>>>,
    Query(filter): Query<BookingFilter>,
) -> Response
where
    S: BookingStore + 'static,
{
    match service.list(&filter) {
        Ok(bookings) => (StatusCode::OK, Json(bookings)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn stats_handler<S>(
    State(service): State<Arc<BookingAdmissionService<S>>>,
) -> Response
where
    S: BookingStore + 'static,
{
    match service.stats() {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn export_handler<S>(
    State(service): State<Arc<BookingAdmissionService<S>>>,
    Query(filter): Query<BookingFilter>,
) -> Response
where
    S: BookingStore + 'static,
{
    match service.export_csv(&filter) {
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
                ),
            ],
            csv,
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn show_handler<S>(
    State(service): State<Arc<BookingAdmissionService<S>>>,
    Path(booking_id): Path<String>,
) -> Response
where
    S: BookingStore + 'static,
{
    match service.get(&BookingId(booking_id)) {
        Ok(booking) => (StatusCode::OK, Json(booking)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn confirmation_handler<S>(
    State(service): State<Arc<BookingAdmissionService<S>>>,
    Path(booking_id): Path<String>,
) -> Response
where
    S: BookingStore + 'static,
{
    match service.confirmation(&BookingId(booking_id)) {
        Ok(document) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", document.file_name),
                ),
            ],
            document.render_text(),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn status_handler<S>(
    State(service): State<Arc<BookingAdmissionService<S>>>,
    Path(booking_id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Response
where
    S: BookingStore + 'static,
{
    let id = BookingId(booking_id);
    match off_runtime(service, move |service| service.update_status(&id, update.status)).await {
        Ok(booking) => (StatusCode::OK, Json(booking)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_handler<S>(
    State(service): State<Arc<BookingAdmissionService<S>>>,
    Path(booking_id): Path<String>,
) -> Response
where
    S: BookingStore + 'static,
{
    let id = BookingId(booking_id);
    match off_runtime(service, move |service| service.delete(&id)).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

/// Run a store-writing operation on the blocking pool. Saves touch the disk
/// while the collection lock is held.
async fn off_runtime<S, T, F>(
    service: Arc<BookingAdmissionService<S>>,
    work: F,
) -> Result<T, BookingServiceError>
where
    S: BookingStore + 'static,
    T: Send + 'static,
    F: FnOnce(&BookingAdmissionService<S>) -> Result<T, BookingServiceError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || work(&service)).await?
}

impl IntoResponse for BookingServiceError {
    fn into_response(self) -> Response {
        match self {
            BookingServiceError::Admission(AdmissionError::Validation(errors)) => {
                let violations: Vec<_> = errors
                    .iter()
                    .map(|error| {
                        json!({
                            "field": error.field,
                            "message": error.message(),
                            "violation": error.violation,
                        })
                    })
                    .collect();
                let payload = json!({
                    "error": errors.to_string(),
                    "violations": violations,
                });
                (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
            }
            BookingServiceError::Admission(AdmissionError::Conflict(conflict)) => {
                let payload = json!({
                    "error": AdmissionError::Conflict(conflict.clone()).to_string(),
                    "conflict": conflict,
                });
                (StatusCode::CONFLICT, Json(payload)).into_response()
            }
            other if other.is_not_found() => {
                let payload = json!({ "error": other.to_string() });
                (StatusCode::NOT_FOUND, Json(payload)).into_response()
            }
            other => {
                let payload = json!({ "error": other.to_string() });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
            }
        }
    }
}
