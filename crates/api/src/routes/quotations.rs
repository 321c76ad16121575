//! Quotation lifecycle routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{delete, get, patch, post},
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
    DocumentHeader, DocumentLine, DocumentTotals, pdf_filename, quotation_html,
};
use aperture_core::quotation::{ItemCategory, QuotationStatus, ServiceDetails};
use aperture_db::repositories::customer::CustomerRepository;
use aperture_db::repositories::quotation::{
    CreateQuotationInput, QuotationItemInput, QuotationRepoError, QuotationRepository,
    QuotationWithItems, UpdateQuotationInput,
};
use aperture_shared::notify::Delivery;

/// Creates the quotation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quotations", get(list_quotations))
        .route("/quotations", post(create_quotation))
        .route("/quotations/{quotation_id}", get(get_quotation))
        .route("/quotations/{quotation_id}", patch(update_quotation))
        .route("/quotations/{quotation_id}", delete(delete_quotation))
        .route("/quotations/{quotation_id}/mark-pending", post(mark_pending))
        .route("/quotations/{quotation_id}/confirm", post(confirm_quotation))
        .route("/quotations/{quotation_id}/decline", post(decline_quotation))
        .route("/quotations/{quotation_id}/document", get(quotation_document))
}

// ============================================================================
// Request types
// ============================================================================

/// Query parameters for listing quotations.
#[derive(Debug, Deserialize)]
pub struct ListQuotationsQuery {
    /// Filter by lifecycle status.
    pub status: Option<String>,
}

/// One line item on a create/update request.
#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    /// Line category.
    pub category: ItemCategory,
    /// Service description.
    pub description: String,
    /// Units.
    pub quantity: i32,
    /// Price per unit.
    pub unit_price: Decimal,
}

impl ItemRequest {
    fn into_input(self) -> QuotationItemInput {
        QuotationItemInput {
            category: self.category,
            description: self.description,
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }
}

/// Request body for creating a quotation.
#[derive(Debug, Deserialize)]
pub struct CreateQuotationRequest {
    /// Customer the quotation is issued to.
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
    /// Coverage and deliverable details off the intake form.
    #[serde(default)]
    pub details: ServiceDetails,
    /// Line items.
    pub items: Vec<ItemRequest>,
    /// Discount percentage of the subtotal.
    #[serde(default)]
    pub discount_percent: Decimal,
    /// Manual discount override; wins over the percentage when set.
    pub discount_amount: Option<Decimal>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Request body for updating a quotation. Absent fields are unchanged;
/// explicit `null` clears a nullable field.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateQuotationRequest {
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
    /// Package name.
    #[serde(default, deserialize_with = "double_option")]
    pub package: Option<Option<String>>,
    /// Replacement coverage and deliverable details, taken wholesale.
    pub details: Option<ServiceDetails>,
    /// Replacement line items.
    pub items: Option<Vec<ItemRequest>>,
    /// New discount percentage; discards any manual override.
    pub discount_percent: Option<Decimal>,
    /// Manual discount override, ignored when the percentage also changes.
    pub discount_amount: Option<Decimal>,
    /// Free-form notes.
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

/// Request body for declining a quotation.
#[derive(Debug, Default, Deserialize)]
pub struct DeclineRequest {
    /// Optional reason given by the customer.
    pub reason: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

fn fail(err: &QuotationRepoError) -> Response {
    if err.status_code() >= 500 {
        error!(error = %err, "quotation operation failed");
    }
    error_response(err.status_code(), err.error_code(), err)
}

fn with_items(status: StatusCode, result: &QuotationWithItems) -> Response {
    (
        status,
        Json(json!({
            "quotation": result.quotation,
            "items": result.items,
        })),
    )
        .into_response()
}

/// POST `/quotations` - Create a draft quotation.
async fn create_quotation(
    State(state): State<AppState>,
    Json(body): Json<CreateQuotationRequest>,
) -> impl IntoResponse {
    let repo = QuotationRepository::new(state.db.clone(), state.documents.clone());
    let input = CreateQuotationInput {
        customer_id: body.customer_id,
        event_type: body.event_type,
        event_date: body.event_date,
        event_end_date: body.event_end_date,
        venue: body.venue,
        city: body.city,
        package: body.package,
        details: body.details,
        items: body.items.into_iter().map(ItemRequest::into_input).collect(),
        discount_percent: body.discount_percent,
        discount_amount: body.discount_amount,
        notes: body.notes,
    };
    match repo.create(input).await {
        Ok(result) => with_items(StatusCode::CREATED, &result),
        Err(err) => fail(&err),
    }
}

/// GET `/quotations` - List quotations, optionally filtered by status.
async fn list_quotations(
    State(state): State<AppState>,
    Query(query): Query<ListQuotationsQuery>,
) -> impl IntoResponse {
    let status = match query.status.as_deref() {
        None => None,
        Some(raw) => match QuotationStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                return bad_request("INVALID_STATUS", "Unknown quotation status");
            }
        },
    };

    let repo = QuotationRepository::new(state.db.clone(), state.documents.clone());
    match repo.list(status).await {
        Ok(quotations) => {
            (StatusCode::OK, Json(json!({ "quotations": quotations }))).into_response()
        }
        Err(err) => fail(&err),
    }
}

/// GET `/quotations/{quotation_id}` - Fetch a quotation with its items.
async fn get_quotation(
    State(state): State<AppState>,
    Path(quotation_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = QuotationRepository::new(state.db.clone(), state.documents.clone());
    match repo.get(quotation_id).await {
        Ok(result) => with_items(StatusCode::OK, &result),
        Err(err) => fail(&err),
    }
}

/// PATCH `/quotations/{quotation_id}` - Update an open quotation.
async fn update_quotation(
    State(state): State<AppState>,
    Path(quotation_id): Path<Uuid>,
    Json(body): Json<UpdateQuotationRequest>,
) -> impl IntoResponse {
    let repo = QuotationRepository::new(state.db.clone(), state.documents.clone());
    let input = UpdateQuotationInput {
        event_type: body.event_type,
        event_date: body.event_date,
        event_end_date: body.event_end_date,
        venue: body.venue,
        city: body.city,
        package: body.package,
        details: body.details,
        items: body
            .items
            .map(|items| items.into_iter().map(ItemRequest::into_input).collect()),
        discount_percent: body.discount_percent,
        discount_amount: body.discount_amount,
        notes: body.notes,
    };
    match repo.update(quotation_id, input).await {
        Ok(result) => with_items(StatusCode::OK, &result),
        Err(err) => fail(&err),
    }
}

/// DELETE `/quotations/{quotation_id}` - Delete a non-confirmed quotation.
async fn delete_quotation(
    State(state): State<AppState>,
    Path(quotation_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = QuotationRepository::new(state.db.clone(), state.documents.clone());
    match repo.delete(quotation_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => fail(&err),
    }
}

/// POST `/quotations/{quotation_id}/mark-pending` - Send a draft to the
/// customer.
async fn mark_pending(
    State(state): State<AppState>,
    Path(quotation_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = QuotationRepository::new(state.db.clone(), state.documents.clone());
    match repo.mark_pending(quotation_id).await {
        Ok(quotation) => {
            (StatusCode::OK, Json(json!({ "quotation": quotation }))).into_response()
        }
        Err(err) => fail(&err),
    }
}

/// POST `/quotations/{quotation_id}/confirm` - Confirm a quotation and
/// spawn its order.
///
/// The WhatsApp confirmation fires after the transaction commits and is
/// best-effort: a failed notification never fails the confirmation.
async fn confirm_quotation(
    State(state): State<AppState>,
    Path(quotation_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = QuotationRepository::new(state.db.clone(), state.documents.clone());
    let (quotation, order) = match repo.confirm(quotation_id).await {
        Ok(result) => result,
        Err(err) => return fail(&err),
    };

    let message = state.notifier.confirmation_message(
        &order.customer_name,
        &order.order_number,
        &order.event_type,
        &order.event_date.format("%d %b %Y").to_string(),
        order.total_amount,
    );
    let whatsapp_link = match state.notifier.send(&order.customer_phone, &message).await {
        Ok(Delivery::Link(link)) => Some(link),
        Ok(_) => None,
        Err(err) => {
            warn!(error = %err, order_number = %order.order_number, "confirmation notification skipped");
            None
        }
    };

    (
        StatusCode::OK,
        Json(json!({
            "quotation": quotation,
            "order": order,
            "whatsapp_link": whatsapp_link,
        })),
    )
        .into_response()
}

/// POST `/quotations/{quotation_id}/decline` - Decline a quotation.
async fn decline_quotation(
    State(state): State<AppState>,
    Path(quotation_id): Path<Uuid>,
    Json(body): Json<DeclineRequest>,
) -> impl IntoResponse {
    let repo = QuotationRepository::new(state.db.clone(), state.documents.clone());
    let quotation = match repo.decline(quotation_id, body.reason).await {
        Ok(quotation) => quotation,
        Err(err) => return fail(&err),
    };

    let customers = CustomerRepository::new(state.db.clone());
    let whatsapp_link = match customers.get(quotation.customer_id).await {
        Ok(customer) => {
            let message = state
                .notifier
                .decline_message(&customer.name, &quotation.quotation_number);
            match state.notifier.send(&customer.phone, &message).await {
                Ok(Delivery::Link(link)) => Some(link),
                Ok(_) => None,
                Err(err) => {
                    warn!(error = %err, "decline notification skipped");
                    None
                }
            }
        }
        Err(err) => {
            warn!(error = %err, "decline notification skipped");
            None
        }
    };

    (
        StatusCode::OK,
        Json(json!({
            "quotation": quotation,
            "whatsapp_link": whatsapp_link,
        })),
    )
        .into_response()
}

/// GET `/quotations/{quotation_id}/document` - Printable quotation HTML.
async fn quotation_document(
    State(state): State<AppState>,
    Path(quotation_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = QuotationRepository::new(state.db.clone(), state.documents.clone());
    let QuotationWithItems { quotation, items } = match repo.get(quotation_id).await {
        Ok(result) => result,
        Err(err) => return fail(&err),
    };
    let customers = CustomerRepository::new(state.db.clone());
    let customer = match customers.get(quotation.customer_id).await {
        Ok(customer) => customer,
        Err(err) => {
            error!(error = %err, "quotation customer lookup failed");
            return error_response(500, "DATABASE_ERROR", &err);
        }
    };

    let header = DocumentHeader {
        studio_name: state.documents.studio_name.clone(),
        number: quotation.quotation_number.clone(),
        customer_name: customer.name.clone(),
        customer_phone: customer.phone.clone(),
        event_type: quotation.event_type.clone(),
        event_date: quotation.event_date,
        event_end_date: quotation.event_end_date,
        venue: quotation.venue.clone(),
        city: quotation.city.clone(),
        package: quotation.package.clone(),
    };
    let lines: Vec<DocumentLine> = items
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
        subtotal: quotation.subtotal,
        discount_amount: quotation.discount_amount,
        total_amount: quotation.total_amount,
    };

    let html = quotation_html(
        &header,
        &lines,
        &totals,
        quotation.valid_until,
        quotation.notes.as_deref(),
    );
    let filename = pdf_filename(&quotation.quotation_number, &customer.name);

    (
        [(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{filename}\""),
        )],
        Html(html),
    )
        .into_response()
}
