//! Payment recording routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use crate::routes::error_response;
use aperture_db::entities::sea_orm_active_enums::PaymentMethod;
use aperture_db::repositories::payment::{
    PaymentError, PaymentRepository, RecordPaymentInput,
};

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders/{order_id}/payments", get(list_payments))
        .route("/orders/{order_id}/payments", post(record_payment))
}

/// Request body for recording a payment.
#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    /// Amount received.
    pub amount: Decimal,
    /// Date the money was received.
    pub payment_date: NaiveDate,
    /// How it was paid.
    pub method: PaymentMethod,
    /// Free-form label ("Advance", "Final settlement", ...).
    pub payment_type: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

fn fail(err: &PaymentError) -> Response {
    if err.status_code() >= 500 {
        error!(error = %err, "payment operation failed");
    }
    error_response(err.status_code(), err.error_code(), err)
}

/// POST `/orders/{order_id}/payments` - Record a payment; the response
/// carries the order with its refreshed payment columns.
async fn record_payment(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(body): Json<RecordPaymentRequest>,
) -> impl IntoResponse {
    let repo = PaymentRepository::new(state.db.clone(), state.documents.clone());
    let input = RecordPaymentInput {
        amount: body.amount,
        payment_date: body.payment_date,
        method: body.method,
        payment_type: body.payment_type,
        notes: body.notes,
    };
    match repo.record(order_id, input).await {
        Ok((payment, order)) => (
            StatusCode::CREATED,
            Json(json!({ "payment": payment, "order": order })),
        )
            .into_response(),
        Err(err) => fail(&err),
    }
}

/// GET `/orders/{order_id}/payments` - List an order's payments.
async fn list_payments(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = PaymentRepository::new(state.db.clone(), state.documents.clone());
    match repo.list(order_id).await {
        Ok(payments) => (StatusCode::OK, Json(json!({ "payments": payments }))).into_response(),
        Err(err) => fail(&err),
    }
}
