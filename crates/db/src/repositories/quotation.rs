//! Quotation repository.
//!
//! Wraps the pure lifecycle service with transactional persistence:
//! pricing is recomputed server-side on every write, items are replaced
//! wholesale, and lifecycle transitions update with a status-qualified
//! predicate so a stale request cannot regress a terminal quotation.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use aperture_core::order::WorkflowStatus;
use aperture_core::pricing::{Discount, PriceBreakdown, PricedLine, resolve_discount};
use aperture_core::quotation::{
    ItemCategory, LifecycleAction, QuotationData, QuotationError, QuotationItemData,
    QuotationService, QuotationStatus, ServiceDetails, build_order,
};
use aperture_shared::config::DocumentConfig;
use aperture_shared::types::{CustomerId, QuotationId, QuotationItemId};

use crate::entities::sea_orm_active_enums;
use crate::entities::{customers, order_items, orders, quotation_items, quotations};
use crate::repositories::numbering::next_document_number;
use crate::repositories::order::apply_order_details;
use aperture_core::numbering::DocumentKind;

/// Error types for quotation operations.
#[derive(Debug, thiserror::Error)]
pub enum QuotationRepoError {
    /// Quotation not found.
    #[error("Quotation not found: {0}")]
    NotFound(Uuid),

    /// Referenced customer not found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    /// A lifecycle rule rejected the operation.
    #[error(transparent)]
    Lifecycle(#[from] QuotationError),

    /// The row changed status underneath this request.
    #[error("Quotation was modified concurrently, please retry")]
    StaleStatus,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl QuotationRepoError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) | Self::CustomerNotFound(_) => 404,
            Self::Lifecycle(err) => err.status_code(),
            Self::StaleStatus => 409,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) | Self::CustomerNotFound(_) => "NOT_FOUND",
            Self::Lifecycle(err) => err.error_code(),
            Self::StaleStatus => "STALE_STATUS",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// One line item on a create/update request.
#[derive(Debug, Clone)]
pub struct QuotationItemInput {
    /// Line category.
    pub category: ItemCategory,
    /// Service description.
    pub description: String,
    /// Units.
    pub quantity: i32,
    /// Price per unit.
    pub unit_price: Decimal,
}

/// Input for creating a quotation.
#[derive(Debug, Clone)]
pub struct CreateQuotationInput {
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
    pub details: ServiceDetails,
    /// Line items.
    pub items: Vec<QuotationItemInput>,
    /// Discount percentage of the subtotal.
    pub discount_percent: Decimal,
    /// Manual discount override; wins over the percentage when set.
    pub discount_amount: Option<Decimal>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Input for updating a quotation. `None` fields are left unchanged;
/// `items`, when present, replaces the line items wholesale.
#[derive(Debug, Clone, Default)]
pub struct UpdateQuotationInput {
    /// Event type.
    pub event_type: Option<String>,
    /// Event start date.
    pub event_date: Option<NaiveDate>,
    /// Event end date (doubly optional: `Some(None)` clears it).
    pub event_end_date: Option<Option<NaiveDate>>,
    /// Venue name.
    pub venue: Option<Option<String>>,
    /// Venue city.
    pub city: Option<Option<String>>,
    /// Package name.
    pub package: Option<Option<String>>,
    /// Replacement coverage and deliverable details, taken wholesale.
    pub details: Option<ServiceDetails>,
    /// Replacement line items.
    pub items: Option<Vec<QuotationItemInput>>,
    /// New discount percentage; discards any manual override.
    pub discount_percent: Option<Decimal>,
    /// Manual discount override, ignored when the percentage also changes.
    pub discount_amount: Option<Decimal>,
    /// Free-form notes.
    pub notes: Option<Option<String>>,
}

/// A quotation with its line items in display order.
#[derive(Debug, Clone)]
pub struct QuotationWithItems {
    /// Quotation header.
    pub quotation: quotations::Model,
    /// Line items ordered by position.
    pub items: Vec<quotation_items::Model>,
}

/// Quotation repository.
#[derive(Debug, Clone)]
pub struct QuotationRepository {
    db: DatabaseConnection,
    documents: DocumentConfig,
}

impl QuotationRepository {
    /// Creates a new quotation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, documents: DocumentConfig) -> Self {
        Self { db, documents }
    }

    /// Creates a draft quotation with its items, numbering it from the
    /// counter inside the same transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer does not exist or a write fails.
    pub async fn create(
        &self,
        input: CreateQuotationInput,
    ) -> Result<QuotationWithItems, QuotationRepoError> {
        customers::Entity::find_by_id(input.customer_id)
            .one(&self.db)
            .await?
            .ok_or(QuotationRepoError::CustomerNotFound(input.customer_id))?;

        // A manual discount amount puts the quotation in override mode;
        // the stored percentage stays NULL until a percentage is set.
        let (stored_percent, discount) = match input.discount_amount {
            Some(amount) => (None, Discount::Override(amount)),
            None => (
                Some(input.discount_percent),
                Discount::Percent(input.discount_percent),
            ),
        };
        let breakdown = PriceBreakdown::compute(&priced_lines(&input.items), discount);

        let today = Utc::now().date_naive();
        let now = Utc::now().into();
        let quotation_id = Uuid::new_v4();

        let txn = self.db.begin().await?;

        let number =
            next_document_number(&txn, DocumentKind::Quotation, &self.documents.studio_code, today)
                .await?;

        let mut quotation = quotations::ActiveModel {
            id: Set(quotation_id),
            quotation_number: Set(number),
            customer_id: Set(input.customer_id),
            event_type: Set(input.event_type),
            event_date: Set(input.event_date),
            event_end_date: Set(input.event_end_date),
            venue: Set(input.venue),
            city: Set(input.city),
            package: Set(input.package),
            status: Set(sea_orm_active_enums::QuotationStatus::Draft),
            subtotal: Set(breakdown.subtotal),
            discount_percent: Set(stored_percent),
            discount_amount: Set(breakdown.discount_amount),
            tax_amount: Set(Decimal::ZERO),
            total_amount: Set(breakdown.total),
            valid_until: Set(QuotationService::valid_until(
                today,
                self.documents.validity_days,
            )),
            notes: Set(input.notes),
            order_id: Set(None),
            confirmed_at: Set(None),
            declined_at: Set(None),
            decline_reason: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_details(&mut quotation, input.details);
        let quotation = quotation.insert(&txn).await?;

        let items = insert_items(&txn, quotation_id, &input.items).await?;

        txn.commit().await?;

        Ok(QuotationWithItems { quotation, items })
    }

    /// Lists quotations, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        status: Option<QuotationStatus>,
    ) -> Result<Vec<quotations::Model>, QuotationRepoError> {
        let mut query = quotations::Entity::find();
        if let Some(status) = status {
            query = query.filter(
                quotations::Column::Status
                    .eq(sea_orm_active_enums::QuotationStatus::from(status)),
            );
        }
        Ok(query
            .order_by_desc(quotations::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Fetches a quotation with its items.
    ///
    /// # Errors
    ///
    /// Returns an error if the quotation does not exist or the query fails.
    pub async fn get(&self, id: Uuid) -> Result<QuotationWithItems, QuotationRepoError> {
        let quotation = quotations::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(QuotationRepoError::NotFound(id))?;
        let items = self.items_of(id).await?;
        Ok(QuotationWithItems { quotation, items })
    }

    async fn items_of(
        &self,
        quotation_id: Uuid,
    ) -> Result<Vec<quotation_items::Model>, QuotationRepoError> {
        Ok(quotation_items::Entity::find()
            .filter(quotation_items::Column::QuotationId.eq(quotation_id))
            .order_by_asc(quotation_items::Column::Position)
            .all(&self.db)
            .await?)
    }

    /// Updates an open quotation, replacing items wholesale when provided
    /// and recomputing pricing server-side.
    ///
    /// A changed `discount_percent` discards any manual override; a
    /// `discount_amount` alone becomes the override (last write wins). An
    /// override in force survives edits that touch neither field.
    ///
    /// # Errors
    ///
    /// Returns an error if the quotation is terminal or a write fails.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateQuotationInput,
    ) -> Result<QuotationWithItems, QuotationRepoError> {
        let existing = quotations::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(QuotationRepoError::NotFound(id))?;

        QuotationService::ensure_editable(existing.status.clone().into())?;

        let txn = self.db.begin().await?;

        let items = if let Some(ref new_items) = input.items {
            quotation_items::Entity::delete_many()
                .filter(quotation_items::Column::QuotationId.eq(id))
                .exec(&txn)
                .await?;
            insert_items(&txn, id, new_items).await?
        } else {
            quotation_items::Entity::find()
                .filter(quotation_items::Column::QuotationId.eq(id))
                .order_by_asc(quotation_items::Column::Position)
                .all(&txn)
                .await?
        };

        let subtotal: Decimal = items.iter().map(|i| i.total_price).sum();
        let (stored_percent, discount) = resolve_discount(
            existing.discount_percent,
            existing.discount_amount,
            input.discount_percent,
            input.discount_amount,
        );
        let breakdown = PriceBreakdown::from_subtotal(subtotal, discount);

        let mut active: quotations::ActiveModel = existing.into();
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
        if let Some(package) = input.package {
            active.package = Set(package);
        }
        if let Some(details) = input.details {
            apply_details(&mut active, details);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(notes);
        }
        active.subtotal = Set(breakdown.subtotal);
        active.discount_percent = Set(stored_percent);
        active.discount_amount = Set(breakdown.discount_amount);
        active.total_amount = Set(breakdown.total);
        active.updated_at = Set(Utc::now().into());

        let quotation = active.update(&txn).await?;

        txn.commit().await?;

        Ok(QuotationWithItems { quotation, items })
    }

    /// Marks a draft quotation as sent to the customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the quotation is not in Draft or a write fails.
    pub async fn mark_pending(&self, id: Uuid) -> Result<quotations::Model, QuotationRepoError> {
        let existing = quotations::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(QuotationRepoError::NotFound(id))?;
        let current: QuotationStatus = existing.status.clone().into();

        let action = QuotationService::mark_pending(current)?;

        let mut active: quotations::ActiveModel = existing.into();
        active.status = Set(action.new_status().into());
        active.updated_at = Set(Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Declines an open quotation with an optional reason.
    ///
    /// # Errors
    ///
    /// Returns an error if the quotation is terminal or a write fails.
    pub async fn decline(
        &self,
        id: Uuid,
        reason: Option<String>,
    ) -> Result<quotations::Model, QuotationRepoError> {
        let existing = quotations::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(QuotationRepoError::NotFound(id))?;
        let current: QuotationStatus = existing.status.clone().into();

        let action = QuotationService::decline(current, reason)?;
        let LifecycleAction::Decline {
            new_status,
            declined_at,
            decline_reason,
        } = action
        else {
            return Err(QuotationRepoError::StaleStatus);
        };

        let mut active: quotations::ActiveModel = existing.into();
        active.status = Set(new_status.into());
        active.declined_at = Set(Some(declined_at.into()));
        active.decline_reason = Set(decline_reason);
        active.updated_at = Set(Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Confirms an open quotation, spawning its order in one transaction.
    ///
    /// The quotation row is locked for the duration, the order number is
    /// allocated from the counter, and the order is a frozen snapshot
    /// built by the core; later customer edits never touch it.
    ///
    /// # Errors
    ///
    /// Returns an error if the quotation is terminal, the snapshot data is
    /// incomplete, or a write fails.
    pub async fn confirm(
        &self,
        id: Uuid,
    ) -> Result<(quotations::Model, orders::Model), QuotationRepoError> {
        let txn = self.db.begin().await?;

        let existing = quotations::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(QuotationRepoError::NotFound(id))?;
        let current: QuotationStatus = existing.status.clone().into();

        let action = QuotationService::confirm(current)?;
        let LifecycleAction::Confirm {
            new_status,
            confirmed_at,
        } = action
        else {
            return Err(QuotationRepoError::StaleStatus);
        };

        let customer = customers::Entity::find_by_id(existing.customer_id)
            .one(&txn)
            .await?
            .ok_or(QuotationRepoError::CustomerNotFound(existing.customer_id))?;

        let item_models = quotation_items::Entity::find()
            .filter(quotation_items::Column::QuotationId.eq(id))
            .order_by_asc(quotation_items::Column::Position)
            .all(&txn)
            .await?;

        let today = Utc::now().date_naive();
        let order_number =
            next_document_number(&txn, DocumentKind::Order, &self.documents.studio_code, today)
                .await?;

        let snapshot = QuotationData {
            id: QuotationId::from_uuid(existing.id),
            customer_id: CustomerId::from_uuid(existing.customer_id),
            customer_name: customer.name.clone(),
            customer_phone: customer.phone.clone(),
            event_type: existing.event_type.clone(),
            event_date: existing.event_date,
            event_end_date: existing.event_end_date,
            venue: existing.venue.clone(),
            city: existing.city.clone(),
            package: existing.package.clone(),
            details: service_details(&existing),
            subtotal: existing.subtotal,
            discount_amount: existing.discount_amount,
            total_amount: existing.total_amount,
            notes: existing.notes.clone(),
        };
        let item_data: Vec<QuotationItemData> = item_models
            .iter()
            .map(|item| QuotationItemData {
                id: QuotationItemId::from_uuid(item.id),
                category: item.category.clone().into(),
                description: item.description.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                total_price: item.total_price,
                position: item.position,
            })
            .collect();

        let draft = build_order(order_number, &snapshot, &item_data);

        let now = Utc::now().into();
        let order_id = Uuid::new_v4();
        let mut order = orders::ActiveModel {
            id: Set(order_id),
            order_number: Set(draft.order_number),
            quotation_id: Set(Some(existing.id)),
            customer_id: Set(existing.customer_id),
            customer_name: Set(draft.customer_name),
            customer_phone: Set(draft.customer_phone),
            event_type: Set(draft.event_type),
            event_date: Set(draft.event_date),
            event_end_date: Set(draft.event_end_date),
            venue: Set(draft.venue),
            city: Set(draft.city),
            package: Set(draft.package),
            subtotal: Set(draft.subtotal),
            discount_amount: Set(draft.discount_amount),
            tax_amount: Set(existing.tax_amount),
            total_amount: Set(draft.total_amount),
            final_budget: Set(None),
            amount_paid: Set(draft.amount_paid),
            balance_due: Set(draft.balance_due),
            payment_status: Set(draft.payment_status.into()),
            workflow_status: Set(WorkflowStatus::new().to_json()),
            order_completed: Set(false),
            notes: Set(draft.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_order_details(&mut order, draft.details);
        let order = order.insert(&txn).await?;

        for item in draft.items {
            let row = order_items::ActiveModel {
                id: Set(item.id.into_inner()),
                order_id: Set(order_id),
                quotation_item_id: Set(Some(item.quotation_item_id.into_inner())),
                category: Set(item.category.into()),
                description: Set(item.description),
                quantity: Set(item.quantity),
                unit_price: Set(item.unit_price),
                total_price: Set(item.total_price),
                position: Set(item.position),
                created_at: Set(now),
            };
            row.insert(&txn).await?;
        }

        let mut active: quotations::ActiveModel = existing.into();
        active.status = Set(new_status.into());
        active.order_id = Set(Some(order_id));
        active.confirmed_at = Set(Some(confirmed_at.into()));
        active.updated_at = Set(now);
        let quotation = active.update(&txn).await?;

        txn.commit().await?;

        Ok((quotation, order))
    }

    /// Deletes a quotation and its items.
    ///
    /// Confirmed quotations are rejected: their order holds the
    /// back-reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the quotation is confirmed or a write fails.
    pub async fn delete(&self, id: Uuid) -> Result<(), QuotationRepoError> {
        let existing = quotations::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(QuotationRepoError::NotFound(id))?;

        QuotationService::ensure_deletable(existing.status.into())?;

        // Items cascade at the schema level.
        quotations::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}

/// Writes a full set of coverage details onto a quotation row.
fn apply_details(active: &mut quotations::ActiveModel, details: ServiceDetails) {
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

/// Reads a quotation row's coverage details back into the core type.
fn service_details(quotation: &quotations::Model) -> ServiceDetails {
    ServiceDetails {
        photo_type: quotation.photo_type.clone(),
        video_type: quotation.video_type.clone(),
        area: quotation.area.clone(),
        camera_count: quotation.camera_count,
        rate: quotation.rate,
        session: quotation.session.clone(),
        album_count: quotation.album_count,
        album_sheets: quotation.album_sheets,
        album_photos: quotation.album_photos,
        album_size: quotation.album_size.clone(),
        mini_books: quotation.mini_books,
        calendars: quotation.calendars,
        frames: quotation.frames,
    }
}

fn priced_lines(items: &[QuotationItemInput]) -> Vec<PricedLine> {
    items
        .iter()
        .map(|item| PricedLine {
            quantity: item.quantity,
            unit_price: item.unit_price,
        })
        .collect()
}

async fn insert_items(
    txn: &DatabaseTransaction,
    quotation_id: Uuid,
    items: &[QuotationItemInput],
) -> Result<Vec<quotation_items::Model>, QuotationRepoError> {
    let now = Utc::now().into();
    let mut result = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let position = i32::try_from(index).unwrap_or(i32::MAX).saturating_add(1);
        let line_total = PricedLine {
            quantity: item.quantity,
            unit_price: item.unit_price,
        }
        .line_total();
        let row = quotation_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            quotation_id: Set(quotation_id),
            category: Set(item.category.into()),
            description: Set(item.description.clone()),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
            total_price: Set(line_total),
            position: Set(position),
            created_at: Set(now),
        };
        result.push(row.insert(txn).await?);
    }
    Ok(result)
}
