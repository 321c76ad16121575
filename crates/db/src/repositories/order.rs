//! Order repository.
//!
//! Orders come from confirmed quotations (see the quotation repository)
//! or are created standalone for walk-in work. Derived financial columns
//! are recomputed inside the same transaction as any write that affects
//! them; the workflow map is validated through the core types on read.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::warn;
use uuid::Uuid;

use aperture_core::order::{
    ExpenseLine, ExpenseSplit, FinancialSnapshot, ProductionStage, StageStatus, WorkflowStatus,
    profit,
};
use aperture_core::pricing::PricedLine;
use aperture_core::quotation::{ItemCategory, ServiceDetails};
use aperture_shared::config::DocumentConfig;

use crate::entities::{customers, expenses, order_items, orders, payments};
use crate::repositories::numbering::next_document_number;
use aperture_core::numbering::DocumentKind;

/// Error types for order operations.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// Order not found.
    #[error("Order not found: {0}")]
    NotFound(Uuid),

    /// Referenced customer not found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl OrderError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::CustomerNotFound(_) => 404,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) | Self::CustomerNotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// One line item on a standalone order create.
#[derive(Debug, Clone)]
pub struct OrderItemInput {
    /// Line category.
    pub category: ItemCategory,
    /// Service description.
    pub description: String,
    /// Units.
    pub quantity: i32,
    /// Price per unit.
    pub unit_price: Decimal,
}

/// Input for creating a standalone order (no quotation).
#[derive(Debug, Clone)]
pub struct CreateOrderInput {
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
    pub details: ServiceDetails,
    /// Line items.
    pub items: Vec<OrderItemInput>,
    /// Flat discount off the subtotal.
    pub discount_amount: Decimal,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Input for updating an order. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateOrderInput {
    /// Event type.
    pub event_type: Option<String>,
    /// Event start date.
    pub event_date: Option<NaiveDate>,
    /// Event end date (`Some(None)` clears it).
    pub event_end_date: Option<Option<NaiveDate>>,
    /// Venue name.
    pub venue: Option<Option<String>>,
    /// Venue city.
    pub city: Option<Option<String>>,
    /// Negotiated budget; changing it recomputes the balance and status.
    pub final_budget: Option<Option<Decimal>>,
    /// Manual completion flag.
    pub order_completed: Option<bool>,
    /// Free-form notes.
    pub notes: Option<Option<String>>,
}

/// An order with its items, money history, and derived figures.
#[derive(Debug, Clone)]
pub struct OrderWithRollups {
    /// Order header.
    pub order: orders::Model,
    /// Line items ordered by position.
    pub items: Vec<order_items::Model>,
    /// Payments, oldest first.
    pub payments: Vec<payments::Model>,
    /// Expenses, oldest first.
    pub expenses: Vec<expenses::Model>,
    /// Validated workflow map.
    pub workflow: WorkflowStatus,
    /// Sum of all expenses.
    pub total_expenses: Decimal,
    /// Expenses split into service vs post-production costs.
    pub expense_split: ExpenseSplit,
    /// Effective budget minus total expenses.
    pub profit: Decimal,
}

/// Order repository.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    db: DatabaseConnection,
    documents: DocumentConfig,
}

impl OrderRepository {
    /// Creates a new order repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, documents: DocumentConfig) -> Self {
        Self { db, documents }
    }

    /// Creates a standalone order with its items.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer does not exist or a write fails.
    pub async fn create(&self, input: CreateOrderInput) -> Result<orders::Model, OrderError> {
        let customer = customers::Entity::find_by_id(input.customer_id)
            .one(&self.db)
            .await?
            .ok_or(OrderError::CustomerNotFound(input.customer_id))?;

        let subtotal: Decimal = input
            .items
            .iter()
            .map(|item| {
                PricedLine {
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                }
                .line_total()
            })
            .sum();
        let total_amount = subtotal - input.discount_amount;

        let today = Utc::now().date_naive();
        let now = Utc::now().into();
        let order_id = Uuid::new_v4();

        let txn = self.db.begin().await?;

        let order_number =
            next_document_number(&txn, DocumentKind::Order, &self.documents.studio_code, today)
                .await?;

        let mut order = orders::ActiveModel {
            id: Set(order_id),
            order_number: Set(order_number),
            quotation_id: Set(None),
            customer_id: Set(input.customer_id),
            customer_name: Set(customer.name),
            customer_phone: Set(customer.phone),
            event_type: Set(input.event_type),
            event_date: Set(input.event_date),
            event_end_date: Set(input.event_end_date),
            venue: Set(input.venue),
            city: Set(input.city),
            package: Set(input.package),
            subtotal: Set(subtotal),
            discount_amount: Set(input.discount_amount),
            tax_amount: Set(Decimal::ZERO),
            total_amount: Set(total_amount),
            final_budget: Set(None),
            amount_paid: Set(Decimal::ZERO),
            balance_due: Set(total_amount),
            payment_status: Set(
                FinancialSnapshot::compute(total_amount, None, Decimal::ZERO)
                    .payment_status
                    .into(),
            ),
            workflow_status: Set(WorkflowStatus::new().to_json()),
            order_completed: Set(false),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_order_details(&mut order, input.details);
        let order = order.insert(&txn).await?;

        for (index, item) in input.items.iter().enumerate() {
            let position = i32::try_from(index).unwrap_or(i32::MAX).saturating_add(1);
            let line_total = PricedLine {
                quantity: item.quantity,
                unit_price: item.unit_price,
            }
            .line_total();
            let row = order_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                quotation_item_id: Set(None),
                category: Set(item.category.into()),
                description: Set(item.description.clone()),
                quantity: Set(item.quantity),
                unit_price: Set(item.unit_price),
                total_price: Set(line_total),
                position: Set(position),
                created_at: Set(now),
            };
            row.insert(&txn).await?;
        }

        txn.commit().await?;

        Ok(order)
    }

    /// Lists orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self) -> Result<Vec<orders::Model>, OrderError> {
        Ok(orders::Entity::find()
            .order_by_desc(orders::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Fetches an order with its items, payments, expenses, and derived
    /// figures.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or a query fails.
    pub async fn get(&self, id: Uuid) -> Result<OrderWithRollups, OrderError> {
        let order = orders::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(OrderError::NotFound(id))?;

        let items = order_items::Entity::find()
            .filter(order_items::Column::OrderId.eq(id))
            .order_by_asc(order_items::Column::Position)
            .all(&self.db)
            .await?;
        let payment_rows = payments::Entity::find()
            .filter(payments::Column::OrderId.eq(id))
            .order_by_asc(payments::Column::PaymentDate)
            .all(&self.db)
            .await?;
        let expense_rows = expenses::Entity::find()
            .filter(expenses::Column::OrderId.eq(id))
            .order_by_asc(expenses::Column::ExpenseDate)
            .all(&self.db)
            .await?;

        let workflow = parse_workflow(&order);
        let total_expenses: Decimal = expense_rows.iter().map(|e| e.amount).sum();
        let expense_lines: Vec<ExpenseLine> = expense_rows
            .iter()
            .map(|e| ExpenseLine {
                category: e.category.clone(),
                linked_to_item: e.order_item_id.is_some(),
                amount: e.amount,
            })
            .collect();
        let expense_split = ExpenseSplit::compute(&expense_lines);
        let order_profit = profit(order.total_amount, order.final_budget, total_expenses);

        Ok(OrderWithRollups {
            order,
            items,
            payments: payment_rows,
            expenses: expense_rows,
            workflow,
            total_expenses,
            expense_split,
            profit: order_profit,
        })
    }

    /// Updates an order's event fields, budget, completion flag, or notes.
    ///
    /// A changed `final_budget` recomputes the balance and payment status
    /// in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or a write fails.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateOrderInput,
    ) -> Result<orders::Model, OrderError> {
        let txn = self.db.begin().await?;

        let existing = orders::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(OrderError::NotFound(id))?;

        let budget_changed = input.final_budget.is_some();
        let total_amount = existing.total_amount;
        let amount_paid = existing.amount_paid;
        let new_budget = input.final_budget.unwrap_or(existing.final_budget);

        let mut active: orders::ActiveModel = existing.into();
        if let Some(event_type) = input.event_type {
            active.event_type = Set(event_type);
        }
        if let Some(event_date) = input.event_date {
            active.event_date = Set(event_date);
        }
        if let Some(event_end_date) = input.event_end_date {
            active.event_end_date = Set(event_end_date);
        }
        if let Some(venue) = input.venue {
            active.venue = Set(venue);
        }
        if let Some(city) = input.city {
            active.city = Set(city);
        }
        if let Some(completed) = input.order_completed {
            active.order_completed = Set(completed);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(notes);
        }
        if budget_changed {
            let snapshot = FinancialSnapshot::compute(total_amount, new_budget, amount_paid);
            active.final_budget = Set(new_budget);
            active.balance_due = Set(snapshot.balance_due);
            active.payment_status = Set(snapshot.payment_status.into());
        }
        active.updated_at = Set(Utc::now().into());

        let order = active.update(&txn).await?;
        txn.commit().await?;
        Ok(order)
    }

    /// Sets one production stage on the order's workflow map.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or a write fails.
    pub async fn set_stage(
        &self,
        id: Uuid,
        stage: ProductionStage,
        status: StageStatus,
    ) -> Result<orders::Model, OrderError> {
        self.update_workflow(id, |workflow| workflow.set(stage, status))
            .await
    }

    /// Resets every production stage back to not started.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or a write fails.
    pub async fn reset_workflow(&self, id: Uuid) -> Result<orders::Model, OrderError> {
        self.update_workflow(id, WorkflowStatus::reset).await
    }

    async fn update_workflow<F>(&self, id: Uuid, apply: F) -> Result<orders::Model, OrderError>
    where
        F: FnOnce(&mut WorkflowStatus),
    {
        let txn = self.db.begin().await?;

        let existing = orders::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(OrderError::NotFound(id))?;

        let mut workflow = parse_workflow(&existing);
        apply(&mut workflow);

        let mut active: orders::ActiveModel = existing.into();
        active.workflow_status = Set(workflow.to_json());
        active.updated_at = Set(Utc::now().into());

        let order = active.update(&txn).await?;
        txn.commit().await?;
        Ok(order)
    }

    /// Deletes an order. Items, payments, and expenses cascade at the
    /// schema level; the quotation back-reference is nulled.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or the delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<(), OrderError> {
        let result = orders::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(OrderError::NotFound(id));
        }
        Ok(())
    }
}

/// Writes a full set of coverage details onto an order row.
pub(crate) fn apply_order_details(active: &mut orders::ActiveModel, details: ServiceDetails) {
    active.photo_type = Set(details.photo_type);
    active.video_type = Set(details.video_type);
    active.area = Set(details.area);
    active.camera_count = Set(details.camera_count);
    active.rate = Set(details.rate);
    active.session = Set(details.session);
    active.album_count = Set(details.album_count);
    active.album_sheets = Set(details.album_sheets);
    active.album_photos = Set(details.album_photos);
    active.album_size = Set(details.album_size);
    active.mini_books = Set(details.mini_books);
    active.calendars = Set(details.calendars);
    active.frames = Set(details.frames);
}

/// Parses an order's stored workflow map, logging malformed input before
/// falling back to a fresh all-`No` map.
#[must_use]
pub fn parse_workflow(order: &orders::Model) -> WorkflowStatus {
    match WorkflowStatus::from_json(&order.workflow_status) {
        Ok(workflow) => workflow,
        Err(err) => {
            warn!(
                order_id = %order.id,
                order_number = %order.order_number,
                error = %err,
                "malformed workflow map on order, treating as unstarted"
            );
            WorkflowStatus::new()
        }
    }
}

/// Recomputes an order's derived payment columns from its recorded
/// payments, inside the caller's transaction.
///
/// # Errors
///
/// Returns an error if a query or the update fails.
pub(crate) async fn recompute_payments(
    txn: &DatabaseTransaction,
    order: orders::Model,
) -> Result<orders::Model, DbErr> {
    let paid: Decimal = payments::Entity::find()
        .filter(payments::Column::OrderId.eq(order.id))
        .all(txn)
        .await?
        .iter()
        .map(|p| p.amount)
        .sum();

    let snapshot = FinancialSnapshot::compute(order.total_amount, order.final_budget, paid);

    let mut active: orders::ActiveModel = order.into();
    active.amount_paid = Set(snapshot.amount_paid);
    active.balance_due = Set(snapshot.balance_due);
    active.payment_status = Set(snapshot.payment_status.into());
    active.updated_at = Set(Utc::now().into());
    active.update(txn).await
}
