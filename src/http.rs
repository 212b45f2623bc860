use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::{MatchedPath, Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::engine::{validate_filters, Engine, EngineError, FieldErrors};
use crate::observability;

pub type SharedEngine = Arc<Engine>;

pub fn router(engine: SharedEngine) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/venues", get(list_venues))
        .route("/api/venues/:id", get(get_venue))
        .route("/api/cities", get(list_cities))
        .route("/api/bookings", post(create_booking).get(list_bookings))
        .route_layer(middleware::from_fn(track_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(engine)
}

async fn track_requests(path: MatchedPath, req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = path.as_str().to_owned();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    metrics::counter!(
        observability::HTTP_REQUESTS_TOTAL,
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        observability::HTTP_REQUEST_DURATION_SECONDS,
        "method" => method,
        "path" => path
    )
    .record(start.elapsed().as_secs_f64());

    response
}

async fn health() -> &'static str {
    "ok"
}

// ── Venues ───────────────────────────────────────────────

async fn list_venues(
    State(engine): State<SharedEngine>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let query = match validate_filters(&params) {
        Ok(query) => query,
        Err(errors) => return field_errors("Invalid query parameters", errors),
    };
    match engine.list_venues(&query).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn get_venue(State(engine): State<SharedEngine>, Path(id): Path<String>) -> Response {
    match engine.venue(&id).await {
        Ok(venue) => (StatusCode::OK, Json(json!({ "data": venue }))).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn list_cities(State(engine): State<SharedEngine>) -> Response {
    match engine.cities().await {
        Ok(cities) => (StatusCode::OK, Json(json!({ "data": cities }))).into_response(),
        Err(e) => e.into_response(),
    }
}

// ── Bookings ─────────────────────────────────────────────

async fn create_booking(
    State(engine): State<SharedEngine>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(raw) = match body {
        Ok(body) => body,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid JSON in request body" })),
            )
                .into_response();
        }
    };

    match engine.submit_inquiry(&raw).await {
        Ok(created) => {
            metrics::counter!(observability::INQUIRIES_TOTAL, "outcome" => "created")
                .increment(1);
            (
                StatusCode::CREATED,
                Json(json!({
                    "data": created,
                    "message": "Booking inquiry submitted successfully",
                })),
            )
                .into_response()
        }
        Err(e) => {
            metrics::counter!(
                observability::INQUIRIES_TOTAL,
                "outcome" => observability::admission_outcome(&e)
            )
            .increment(1);
            e.into_response()
        }
    }
}

async fn list_bookings(State(engine): State<SharedEngine>) -> Response {
    match engine.list_inquiries().await {
        Ok(rows) => (StatusCode::OK, Json(json!({ "data": rows }))).into_response(),
        Err(e) => e.into_response(),
    }
}

// ── Error mapping ────────────────────────────────────────

fn field_errors(error: &str, details: FieldErrors) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": error, "details": details })),
    )
        .into_response()
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        match self {
            EngineError::Validation(details) => field_errors("Validation failed", details),
            EngineError::VenueNotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Venue not found" })),
            )
                .into_response(),
            EngineError::CapacityExceeded {
                requested,
                capacity,
            } => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": format!(
                        "Attendee count ({requested}) exceeds venue capacity ({capacity})"
                    ),
                    "details": {
                        "attendeeCount": [format!(
                            "Maximum capacity for this venue is {capacity} attendees"
                        )],
                    },
                })),
            )
                .into_response(),
            EngineError::Unavailable { .. } => (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "The venue is not available for the selected dates",
                    "details": {
                        "dates": ["There is already a booking inquiry for these dates. Please choose different dates."],
                    },
                })),
            )
                .into_response(),
            EngineError::Store(e) => {
                // Detail stays server-side; the client gets a generic message.
                tracing::error!("store failure: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Failed to process the request. Please try again later.",
                    })),
                )
                    .into_response()
            }
        }
    }
}
