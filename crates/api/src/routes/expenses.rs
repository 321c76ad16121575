//! Expense tracking routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use crate::routes::{double_option, error_response};
use aperture_db::repositories::expense::{
    CreateExpenseInput, ExpenseError, ExpenseRepository, UpdateExpenseInput,
};

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders/{order_id}/expenses", get(list_expenses))
        .route("/orders/{order_id}/expenses", post(create_expense))
        .route("/orders/{order_id}/expenses/{expense_id}", patch(update_expense))
        .route("/orders/{order_id}/expenses/{expense_id}", delete(delete_expense))
}

/// Request body for creating an expense.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// Service line item the cost is attributed to, when any.
    pub order_item_id: Option<Uuid>,
    /// Display category.
    pub category: String,
    /// Who was paid.
    pub vendor_name: Option<String>,
    /// What the money was spent on.
    pub description: Option<String>,
    /// Amount spent.
    pub amount: Decimal,
    /// Date of the expense.
    pub expense_date: NaiveDate,
}

/// Request body for updating an expense. Absent fields are unchanged;
/// an explicit `null` item id detaches the attribution.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateExpenseRequest {
    /// Line item attribution.
    #[serde(default, deserialize_with = "double_option")]
    pub order_item_id: Option<Option<Uuid>>,
    /// Display category.
    pub category: Option<String>,
    /// Vendor.
    #[serde(default, deserialize_with = "double_option")]
    pub vendor_name: Option<Option<String>>,
    /// Description.
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    /// Amount spent.
    pub amount: Option<Decimal>,
    /// Date of the expense.
    pub expense_date: Option<NaiveDate>,
}

fn fail(err: &ExpenseError) -> Response {
    if err.status_code() >= 500 {
        error!(error = %err, "expense operation failed");
    }
    error_response(err.status_code(), err.error_code(), err)
}

/// POST `/orders/{order_id}/expenses` - Record an expense against an order.
async fn create_expense(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(body): Json<CreateExpenseRequest>,
) -> impl IntoResponse {
    let repo = ExpenseRepository::new(state.db.clone());
    let input = CreateExpenseInput {
        order_item_id: body.order_item_id,
        category: body.category,
        vendor_name: body.vendor_name,
        description: body.description,
        amount: body.amount,
        expense_date: body.expense_date,
    };
    match repo.create(order_id, input).await {
        Ok(expense) => {
            (StatusCode::CREATED, Json(json!({ "expense": expense }))).into_response()
        }
        Err(err) => fail(&err),
    }
}

/// GET `/orders/{order_id}/expenses` - List an order's expenses.
async fn list_expenses(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ExpenseRepository::new(state.db.clone());
    match repo.list(order_id).await {
        Ok(expenses) => (StatusCode::OK, Json(json!({ "expenses": expenses }))).into_response(),
        Err(err) => fail(&err),
    }
}

/// PATCH `/orders/{order_id}/expenses/{expense_id}` - Update an expense.
async fn update_expense(
    State(state): State<AppState>,
    Path((order_id, expense_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpdateExpenseRequest>,
) -> impl IntoResponse {
    let repo = ExpenseRepository::new(state.db.clone());
    let input = UpdateExpenseInput {
        order_item_id: body.order_item_id,
        category: body.category,
        vendor_name: body.vendor_name,
        description: body.description,
        amount: body.amount,
        expense_date: body.expense_date,
    };
    match repo.update(order_id, expense_id, input).await {
        Ok(expense) => (StatusCode::OK, Json(json!({ "expense": expense }))).into_response(),
        Err(err) => fail(&err),
    }
}

/// DELETE `/orders/{order_id}/expenses/{expense_id}` - Delete an expense.
async fn delete_expense(
    State(state): State<AppState>,
    Path((order_id, expense_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let repo = ExpenseRepository::new(state.db.clone());
    match repo.delete(order_id, expense_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => fail(&err),
    }
}
