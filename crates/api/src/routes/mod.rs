//! API route definitions.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde::{Deserialize, Deserializer};
use serde_json::json;

use crate::AppState;

pub mod customers;
pub mod dashboard;
pub mod expenses;
pub mod health;
pub mod orders;
pub mod payments;
pub mod quotations;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(customers::routes())
        .merge(quotations::routes())
        .merge(orders::routes())
        .merge(payments::routes())
        .merge(expenses::routes())
        .merge(dashboard::routes())
}

/// Builds the standard error body. Server-side failures are masked; the
/// details go to the log, not the client.
pub(crate) fn error_response(
    status: u16,
    code: &'static str,
    err: &dyn std::fmt::Display,
) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = if status.is_server_error() {
        "An internal error occurred".to_string()
    } else {
        err.to_string()
    };
    (status, Json(json!({ "error": code, "message": message }))).into_response()
}

/// Shortcut for 400 responses raised by the handlers themselves.
pub(crate) fn bad_request(code: &'static str, message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": code, "message": message })),
    )
        .into_response()
}

/// Deserializes a nullable PATCH field so that an absent key stays `None`
/// while an explicit `null` becomes `Some(None)`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
