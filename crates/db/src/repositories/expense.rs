//! Expense repository.
//!
//! Expenses attach to an order, and optionally to one of its line items
//! via an explicit foreign key; the category string is a display label
//! only. Post-production categories come from the core vocabulary.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{expenses, order_items, orders};

/// Error types for expense operations.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    /// Expense not found.
    #[error("Expense not found: {0}")]
    NotFound(Uuid),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(Uuid),

    /// The referenced line item does not belong to the order.
    #[error("Order item {item} does not belong to order {order}")]
    ItemMismatch {
        /// The referenced line item.
        item: Uuid,
        /// The order being expensed.
        order: Uuid,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ExpenseError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::OrderNotFound(_) => 404,
            Self::ItemMismatch { .. } => 422,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) | Self::OrderNotFound(_) => "NOT_FOUND",
            Self::ItemMismatch { .. } => "ITEM_MISMATCH",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Input for creating an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
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

/// Input for updating an expense. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateExpenseInput {
    /// Line item attribution (`Some(None)` detaches it).
    pub order_item_id: Option<Option<Uuid>>,
    /// Display category.
    pub category: Option<String>,
    /// Vendor (`Some(None)` clears it).
    pub vendor_name: Option<Option<String>>,
    /// Description.
    pub description: Option<Option<String>>,
    /// Amount spent.
    pub amount: Option<Decimal>,
    /// Date of the expense.
    pub expense_date: Option<NaiveDate>,
}

/// Expense repository.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an expense against an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist, the referenced line
    /// item belongs to a different order, or the insert fails.
    pub async fn create(
        &self,
        order_id: Uuid,
        input: CreateExpenseInput,
    ) -> Result<expenses::Model, ExpenseError> {
        orders::Entity::find_by_id(order_id)
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::OrderNotFound(order_id))?;

        if let Some(item_id) = input.order_item_id {
            self.ensure_item_on_order(item_id, order_id).await?;
        }

        let now = Utc::now().into();
        let expense = expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            order_item_id: Set(input.order_item_id),
            category: Set(input.category),
            vendor_name: Set(input.vendor_name),
            description: Set(input.description),
            amount: Set(input.amount),
            expense_date: Set(input.expense_date),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(expense.insert(&self.db).await?)
    }

    /// Lists an order's expenses, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or the query fails.
    pub async fn list(&self, order_id: Uuid) -> Result<Vec<expenses::Model>, ExpenseError> {
        orders::Entity::find_by_id(order_id)
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::OrderNotFound(order_id))?;

        Ok(expenses::Entity::find()
            .filter(expenses::Column::OrderId.eq(order_id))
            .order_by_asc(expenses::Column::ExpenseDate)
            .all(&self.db)
            .await?)
    }

    /// Updates an expense.
    ///
    /// # Errors
    ///
    /// Returns an error if the expense does not exist, a re-attribution
    /// points at another order's line item, or the update fails.
    pub async fn update(
        &self,
        order_id: Uuid,
        expense_id: Uuid,
        input: UpdateExpenseInput,
    ) -> Result<expenses::Model, ExpenseError> {
        let existing = expenses::Entity::find_by_id(expense_id)
            .filter(expenses::Column::OrderId.eq(order_id))
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::NotFound(expense_id))?;

        if let Some(Some(item_id)) = input.order_item_id {
            self.ensure_item_on_order(item_id, order_id).await?;
        }

        let mut active: expenses::ActiveModel = existing.into();
        if let Some(order_item_id) = input.order_item_id {
            active.order_item_id = Set(order_item_id);
        }
        if let Some(category) = input.category {
            active.category = Set(category);
        }
        if let Some(vendor_name) = input.vendor_name {
            active.vendor_name = Set(vendor_name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(amount) = input.amount {
            active.amount = Set(amount);
        }
        if let Some(expense_date) = input.expense_date {
            active.expense_date = Set(expense_date);
        }
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an expense.
    ///
    /// # Errors
    ///
    /// Returns an error if the expense does not exist or the delete fails.
    pub async fn delete(&self, order_id: Uuid, expense_id: Uuid) -> Result<(), ExpenseError> {
        let result = expenses::Entity::delete_many()
            .filter(expenses::Column::Id.eq(expense_id))
            .filter(expenses::Column::OrderId.eq(order_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ExpenseError::NotFound(expense_id));
        }
        Ok(())
    }

    async fn ensure_item_on_order(
        &self,
        item_id: Uuid,
        order_id: Uuid,
    ) -> Result<(), ExpenseError> {
        let item = order_items::Entity::find_by_id(item_id)
            .one(&self.db)
            .await?;
        match item {
            Some(item) if item.order_id == order_id => Ok(()),
            _ => Err(ExpenseError::ItemMismatch {
                item: item_id,
                order: order_id,
            }),
        }
    }
}
