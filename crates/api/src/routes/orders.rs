//! Order workflow and financial routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{delete, get, patch, post, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};
use uuid::Uuid;

use crate::AppState;
use crate::routes::{bad_request, double_option, error_response};
use aperture_core::documents::{
    DocumentHeader, DocumentLine, DocumentTotals, PaymentLine, invoice_html, pdf_filename,
};
use aperture_core::order::{ProductionStage, StageStatus};
use aperture_core::quotation::{ItemCategory, ServiceDetails};
use aperture_db::repositories::order::{
    CreateOrderInput, OrderError, OrderItemInput, OrderRepository, OrderWithRollups,
    UpdateOrderInput,
};
use aperture_shared::notify::Delivery;

/// Creates the order routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders", post(create_order))
        .route("/orders/{order_id}", get(get_order))
        .route("/orders/{order_id}", patch(update_order))
        .route("/orders/{order_id}", delete(delete_order))
        .route("/orders/{order_id}/workflow/{stage}", put(set_stage))
        .route("/orders/{order_id}/workflow/reset", post(reset_workflow))
        .route("/orders/{order_id}/invoice", get(order_invoice))
}

// ============================================================================
// Request types
// ============================================================================

/// One line item on a standalone order.
#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    /// Line category.
    pub category: ItemCategory,
    /// Service description.
    pub description: String,
    /// Units.
    pub quantity: i32,
    /// Price per unit.
    pub unit_price: Decimal,
}

/// Request body for creating a standalone order.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Customer the order belongs to.
    pub customer_id: Uuid,
    /// Event type.
    pub event_type: String,
    /// Event start date.
    pub event_date: NaiveDate,
    /// Event end date for multi-day coverage.
    pub event_end_date: Option<NaiveDate>,
    /// Venue name.
    pub venue: Option<String>,
    /// Venue city.
    pub city: Option<String>,
    /// Package name.
    pub package: Option<String>,
    /// Coverage and deliverable details.
    #[serde(default)]
    pub details: ServiceDetails,
    /// Line items.
    pub items: Vec<OrderItemRequest>,
    /// Flat discount off the subtotal.
    #[serde(default)]
    pub discount_amount: Decimal,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Request body for updating an order. Absent fields are unchanged;
/// explicit `null` clears a nullable field.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateOrderRequest {
    /// Event type.
    pub event_type: Option<String>,
    /// Event start date.
    pub event_date: Option<NaiveDate>,
    /// Event end date.
    #[serde(default, deserialize_with = "double_option")]
    pub event_end_date: Option<Option<NaiveDate>>,
    /// Venue name.
    #[serde(default, deserialize_with = "double_option")]
    pub venue: Option<Option<String>>,
    /// Venue city.
    #[serde(default, deserialize_with = "double_option")]
    pub city: Option<Option<String>>,
    /// Negotiated budget; `null` reverts to the quoted total.
    #[serde(default, deserialize_with = "double_option")]
    pub final_budget: Option<Option<Decimal>>,
    /// Manual completion flag.
    pub order_completed: Option<bool>,
    /// Free-form notes.
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

/// Request body for setting a workflow stage.
#[derive(Debug, Deserialize)]
pub struct SetStageRequest {
    /// New stage status: `no`, `yes`, or `not_needed`.
    pub status: String,
}

// ============================================================================
// Handlers
// ============================================================================

fn fail(err: &OrderError) -> Response {
    if err.status_code() >= 500 {
        error!(error = %err, "order operation failed");
    }
    error_response(err.status_code(), err.error_code(), err)
}

fn rollups_json(rollups: &OrderWithRollups) -> serde_json::Value {
    json!({
        "order": rollups.order,
        "items": rollups.items,
        "payments": rollups.payments,
        "expenses": rollups.expenses,
        "workflow": rollups.workflow.to_json(),
        "workflow_complete": rollups.workflow.is_complete(),
        "total_expenses": rollups.total_expenses,
        "expense_split": {
            "service": rollups.expense_split.service,
            "post_production": rollups.expense_split.post_production,
        },
        "profit": rollups.profit,
    })
}

/// POST `/orders` - Create a standalone order (no quotation).
async fn create_order(
    State(state): State<AppState>,
    Json(body): Json<CreateOrderRequest>,
) -> impl IntoResponse {
    let repo = OrderRepository::new(state.db.clone(), state.documents.clone());
    let input = CreateOrderInput {
        customer_id: body.customer_id,
        event_type: body.event_type,
        event_date: body.event_date,
        event_end_date: body.event_end_date,
        venue: body.venue,
        city: body.city,
        package: body.package,
        details: body.details,
        items: body
            .items
            .into_iter()
            .map(|item| OrderItemInput {
                category: item.category,
                description: item.description,
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect(),
        discount_amount: body.discount_amount,
        notes: body.notes,
    };
    match repo.create(input).await {
        Ok(order) => (StatusCode::CREATED, Json(json!({ "order": order }))).into_response(),
        Err(err) => fail(&err),
    }
}

/// GET `/orders` - List orders, newest first.
async fn list_orders(State(state): State<AppState>) -> impl IntoResponse {
    let repo = OrderRepository::new(state.db.clone(), state.documents.clone());
    match repo.list().await {
        Ok(orders) => (StatusCode::OK, Json(json!({ "orders": orders }))).into_response(),
        Err(err) => fail(&err),
    }
}

/// GET `/orders/{order_id}` - Fetch an order with items, money history,
/// and derived figures.
async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = OrderRepository::new(state.db.clone(), state.documents.clone());
    match repo.get(order_id).await {
        Ok(rollups) => (StatusCode::OK, Json(rollups_json(&rollups))).into_response(),
        Err(err) => fail(&err),
    }
}

/// PATCH `/orders/{order_id}` - Update event fields, budget, completion,
/// or notes.
async fn update_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(body): Json<UpdateOrderRequest>,
) -> impl IntoResponse {
    let repo = OrderRepository::new(state.db.clone(), state.documents.clone());
    let input = UpdateOrderInput {
        event_type: body.event_type,
        event_date: body.event_date,
        event_end_date: body.event_end_date,
        venue: body.venue,
        city: body.city,
        final_budget: body.final_budget,
        order_completed: body.order_completed,
        notes: body.notes,
    };
    match repo.update(order_id, input).await {
        Ok(order) => (StatusCode::OK, Json(json!({ "order": order }))).into_response(),
        Err(err) => fail(&err),
    }
}

/// DELETE `/orders/{order_id}` - Delete an order and its dependents.
async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = OrderRepository::new(state.db.clone(), state.documents.clone());
    match repo.delete(order_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => fail(&err),
    }
}

/// PUT `/orders/{order_id}/workflow/{stage}` - Set one production stage.
///
/// Completing a stage offers a best-effort WhatsApp update when the
/// notifier is configured for it.
async fn set_stage(
    State(state): State<AppState>,
    Path((order_id, stage)): Path<(Uuid, String)>,
    Json(body): Json<SetStageRequest>,
) -> impl IntoResponse {
    let Some(stage) = ProductionStage::parse(&stage) else {
        return bad_request("INVALID_STAGE", "Unknown production stage");
    };
    let Some(status) = StageStatus::parse(&body.status) else {
        return bad_request("INVALID_STATUS", "Unknown stage status");
    };

    let repo = OrderRepository::new(state.db.clone(), state.documents.clone());
    let order = match repo.set_stage(order_id, stage, status).await {
        Ok(order) => order,
        Err(err) => return fail(&err),
    };

    let whatsapp_link = if stage_notification_due(status, state.notifier.notify_on_stage_complete())
    {
        let message = state.notifier.stage_complete_message(
            &order.customer_name,
            &order.order_number,
            stage.label(),
        );
        match state.notifier.send(&order.customer_phone, &message).await {
            Ok(Delivery::Link(link)) => Some(link),
            Ok(_) => None,
            Err(err) => {
                warn!(error = %err, order_number = %order.order_number, "stage notification skipped");
                None
            }
        }
    } else {
        None
    };

    (
        StatusCode::OK,
        Json(json!({ "order": order, "whatsapp_link": whatsapp_link })),
    )
        .into_response()
}

/// POST `/orders/{order_id}/workflow/reset` - Reset every stage.
async fn reset_workflow(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = OrderRepository::new(state.db.clone(), state.documents.clone());
    match repo.reset_workflow(order_id).await {
        Ok(order) => (StatusCode::OK, Json(json!({ "order": order }))).into_response(),
        Err(err) => fail(&err),
    }
}

/// True when setting a stage to `status` should message the customer.
///
/// Both Yes and NotNeeded close a stage out, so both count as progress
/// worth announcing; flipping a stage back to No never does.
fn stage_notification_due(status: StageStatus, enabled: bool) -> bool {
    enabled && status.is_done()
}

/// GET `/orders/{order_id}/invoice` - Printable invoice HTML.
async fn order_invoice(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = OrderRepository::new(state.db.clone(), state.documents.clone());
    let rollups = match repo.get(order_id).await {
        Ok(rollups) => rollups,
        Err(err) => return fail(&err),
    };
    let order = &rollups.order;

    let header = DocumentHeader {
        studio_name: state.documents.studio_name.clone(),
        number: order.order_number.clone(),
        customer_name: order.customer_name.clone(),
        customer_phone: order.customer_phone.clone(),
        event_type: order.event_type.clone(),
        event_date: order.event_date,
        event_end_date: order.event_end_date,
        venue: order.venue.clone(),
        city: order.city.clone(),
        package: order.package.clone(),
    };
    let lines: Vec<DocumentLine> = rollups
        .items
        .iter()
        .map(|item| DocumentLine {
            position: item.position,
            category: ItemCategory::from(item.category.clone()).label().to_string(),
            description: item.description.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            total_price: item.total_price,
        })
        .collect();
    let totals = DocumentTotals {
        subtotal: order.subtotal,
        discount_amount: order.discount_amount,
        total_amount: order.total_amount,
    };
    let payments: Vec<PaymentLine> = rollups
        .payments
        .iter()
        .map(|payment| PaymentLine {
            number: payment.payment_number.clone(),
            date: payment.payment_date,
            method: payment.method.label().to_string(),
            amount: payment.amount,
        })
        .collect();

    let html = invoice_html(
        &header,
        &lines,
        &totals,
        order.amount_paid,
        order.balance_due,
        &payments,
    );
    let filename = pdf_filename(&order.order_number, &order.customer_name);

    (
        [(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{filename}\""),
        )],
        Html(html),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(StageStatus::Yes, true)]
    #[case(StageStatus::NotNeeded, true)]
    #[case(StageStatus::No, false)]
    fn test_stage_notification_fires_when_stage_closes(
        #[case] status: StageStatus,
        #[case] expected: bool,
    ) {
        assert_eq!(stage_notification_due(status, true), expected);
    }

    #[rstest]
    #[case(StageStatus::Yes)]
    #[case(StageStatus::NotNeeded)]
    fn test_disabled_notifier_suppresses_all(#[case] status: StageStatus) {
        assert!(!stage_notification_due(status, false));
    }
}
