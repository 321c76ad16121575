//! Dashboard repository.
//!
//! Fetches fact rows and hands them to the pure core reducer; no
//! aggregation decisions are made here.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};
use uuid::Uuid;

use aperture_core::dashboard::{
    DashboardSummary, OrderFacts, QuotationFacts, ReportWindow, summarize,
};

use crate::entities::{customers, expenses, orders, quotations};
use crate::repositories::order::parse_workflow;

/// Error types for dashboard operations.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl DashboardError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        500
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        "DATABASE_ERROR"
    }
}

/// Dashboard repository.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the dashboard summary for one reporting window.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn summary(&self, window: ReportWindow) -> Result<DashboardSummary, DashboardError> {
        let order_rows = orders::Entity::find().all(&self.db).await?;
        let quotation_rows = quotations::Entity::find().all(&self.db).await?;
        let expense_rows = expenses::Entity::find().all(&self.db).await?;
        let customer_rows = customers::Entity::find().all(&self.db).await?;

        let customer_names: HashMap<Uuid, &str> = customer_rows
            .iter()
            .map(|c| (c.id, c.name.as_str()))
            .collect();

        let mut expenses_by_order: HashMap<Uuid, Decimal> = HashMap::new();
        for expense in &expense_rows {
            *expenses_by_order
                .entry(expense.order_id)
                .or_insert(Decimal::ZERO) += expense.amount;
        }

        let order_facts: Vec<OrderFacts> = order_rows
            .iter()
            .map(|order| OrderFacts {
                order_number: order.order_number.clone(),
                customer_name: order.customer_name.clone(),
                event_type: order.event_type.clone(),
                created_on: order.created_at.date_naive(),
                event_date: order.event_date,
                event_end_date: order.event_end_date,
                total_amount: order.total_amount,
                final_budget: order.final_budget,
                amount_paid: order.amount_paid,
                balance_due: order.balance_due,
                payment_status: order.payment_status.clone().into(),
                total_expenses: expenses_by_order
                    .get(&order.id)
                    .copied()
                    .unwrap_or(Decimal::ZERO),
                workflow: parse_workflow(order),
                completed: order.order_completed,
            })
            .collect();

        let quotation_facts: Vec<QuotationFacts> = quotation_rows
            .iter()
            .map(|quotation| QuotationFacts {
                quotation_number: quotation.quotation_number.clone(),
                customer_name: customer_names
                    .get(&quotation.customer_id)
                    .copied()
                    .unwrap_or_default()
                    .to_string(),
                event_type: quotation.event_type.clone(),
                created_on: quotation.created_at.date_naive(),
                event_date: Some(quotation.event_date),
                total_amount: quotation.total_amount,
                status: quotation.status.clone().into(),
            })
            .collect();

        let today = Utc::now().date_naive();
        Ok(summarize(today, window, &order_facts, &quotation_facts))
    }
}
