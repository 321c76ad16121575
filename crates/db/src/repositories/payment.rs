//! Payment repository.
//!
//! Payments are insert-only receipts. Recording one allocates a `PAY_`
//! number and recomputes the order's paid/balance/status columns inside
//! the same transaction, so the stored rollups can never drift from the
//! payment history.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use aperture_core::numbering::DocumentKind;
use aperture_shared::config::DocumentConfig;

use crate::entities::sea_orm_active_enums::PaymentMethod;
use crate::entities::{orders, payments};
use crate::repositories::numbering::next_document_number;
use crate::repositories::order::recompute_payments;

/// Error types for payment operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(Uuid),

    /// Payment amount must be positive.
    #[error("Payment amount must be greater than zero")]
    NonPositiveAmount,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl PaymentError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::OrderNotFound(_) => 404,
            Self::NonPositiveAmount => 400,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::OrderNotFound(_) => "NOT_FOUND",
            Self::NonPositiveAmount => "INVALID_AMOUNT",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Input for recording a payment.
#[derive(Debug, Clone)]
pub struct RecordPaymentInput {
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

/// Payment repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
    documents: DocumentConfig,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, documents: DocumentConfig) -> Self {
        Self { db, documents }
    }

    /// Records a payment against an order and recomputes the order's
    /// derived payment columns, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist, the amount is not
    /// positive, or a write fails.
    pub async fn record(
        &self,
        order_id: Uuid,
        input: RecordPaymentInput,
    ) -> Result<(payments::Model, orders::Model), PaymentError> {
        if input.amount <= Decimal::ZERO {
            return Err(PaymentError::NonPositiveAmount);
        }

        let txn = self.db.begin().await?;

        let order = orders::Entity::find_by_id(order_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(PaymentError::OrderNotFound(order_id))?;

        let today = Utc::now().date_naive();
        let number =
            next_document_number(&txn, DocumentKind::Payment, &self.documents.studio_code, today)
                .await?;

        let payment = payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            payment_number: Set(number),
            order_id: Set(order_id),
            customer_id: Set(order.customer_id),
            amount: Set(input.amount),
            payment_date: Set(input.payment_date),
            method: Set(input.method),
            payment_type: Set(input.payment_type),
            notes: Set(input.notes),
            created_at: Set(Utc::now().into()),
        };
        let payment = payment.insert(&txn).await?;

        let order = recompute_payments(&txn, order).await?;

        txn.commit().await?;

        Ok((payment, order))
    }

    /// Lists an order's payments, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the order does not exist or the query fails.
    pub async fn list(&self, order_id: Uuid) -> Result<Vec<payments::Model>, PaymentError> {
        orders::Entity::find_by_id(order_id)
            .one(&self.db)
            .await?
            .ok_or(PaymentError::OrderNotFound(order_id))?;

        Ok(payments::Entity::find()
            .filter(payments::Column::OrderId.eq(order_id))
            .order_by_asc(payments::Column::PaymentDate)
            .order_by_asc(payments::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }
}
