//! Customer repository.
//!
//! Customers are intake records: created once, listed newest first, and
//! referenced by quotations and orders. There is no update path; orders
//! freeze their own copy of the contact fields at confirmation.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::entities::customers;

/// Error types for customer operations.
#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    /// Customer not found.
    #[error("Customer not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl CustomerError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// Input for creating a customer.
#[derive(Debug, Clone)]
pub struct CreateCustomerInput {
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

/// Customer repository.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        input: CreateCustomerInput,
    ) -> Result<customers::Model, CustomerError> {
        let now = Utc::now().into();
        let customer = customers::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            phone: Set(input.phone),
            email: Set(input.email),
            address: Set(input.address),
            source: Set(input.source),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(customer.insert(&self.db).await?)
    }

    /// Lists all customers, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self) -> Result<Vec<customers::Model>, CustomerError> {
        Ok(customers::Entity::find()
            .order_by_desc(customers::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Fetches one customer by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer does not exist or the query fails.
    pub async fn get(&self, id: Uuid) -> Result<customers::Model, CustomerError> {
        customers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CustomerError::NotFound(id))
    }
}
