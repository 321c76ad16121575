//! Customer intake routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use crate::routes::error_response;
use aperture_db::repositories::customer::{
    CreateCustomerInput, CustomerError, CustomerRepository,
};

/// Creates the customer routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers))
        .route("/customers", post(create_customer))
        .route("/customers/{customer_id}", get(get_customer))
}

/// Request body for creating a customer.
#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    /// Customer name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Optional email.
    pub email: Option<String>,
    /// Optional postal address.
    pub address: Option<String>,
    /// How the customer found the studio.
    pub source: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

fn fail(err: &CustomerError) -> axum::response::Response {
    if err.status_code() >= 500 {
        error!(error = %err, "customer operation failed");
    }
    error_response(err.status_code(), err.error_code(), err)
}

/// POST `/customers` - Register a customer.
async fn create_customer(
    State(state): State<AppState>,
    Json(body): Json<CreateCustomerRequest>,
) -> impl IntoResponse {
    let repo = CustomerRepository::new(state.db.clone());
    match repo
        .create(CreateCustomerInput {
            name: body.name,
            phone: body.phone,
            email: body.email,
            address: body.address,
            source: body.source,
            notes: body.notes,
        })
        .await
    {
        Ok(customer) => {
            (StatusCode::CREATED, Json(json!({ "customer": customer }))).into_response()
        }
        Err(err) => fail(&err),
    }
}

/// GET `/customers` - List customers, newest first.
async fn list_customers(State(state): State<AppState>) -> impl IntoResponse {
    let repo = CustomerRepository::new(state.db.clone());
    match repo.list().await {
        Ok(customers) => (StatusCode::OK, Json(json!({ "customers": customers }))).into_response(),
        Err(err) => fail(&err),
    }
}

/// GET `/customers/{customer_id}` - Fetch one customer.
async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = CustomerRepository::new(state.db.clone());
    match repo.get(customer_id).await {
        Ok(customer) => (StatusCode::OK, Json(json!({ "customer": customer }))).into_response(),
        Err(err) => fail(&err),
    }
}
