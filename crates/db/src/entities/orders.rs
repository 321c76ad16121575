//! `SeaORM` Entity for the orders table.
//!
//! Customer and event fields are a frozen snapshot taken at confirmation;
//! they are intentionally denormalized and never re-read from customers.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PaymentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub order_number: String,
    /// Back-reference to the confirmed quotation; None for standalone orders.
    pub quotation_id: Option<Uuid>,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
    pub event_type: String,
    pub event_date: Date,
    pub event_end_date: Option<Date>,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub package: Option<String>,
    // Coverage and deliverables, copied verbatim from the quotation
    pub photo_type: Option<String>,
    pub video_type: Option<String>,
    pub area: Option<String>,
    pub camera_count: Option<i32>,
    pub rate: Option<Decimal>,
    pub session: Option<String>,
    pub album_count: Option<i32>,
    pub album_sheets: Option<i32>,
    pub album_photos: Option<i32>,
    pub album_size: Option<String>,
    pub mini_books: Option<i32>,
    pub calendars: Option<i32>,
    pub frames: Option<i32>,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    /// Kept for the books; no calculation reads it.
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    /// Negotiated budget overriding the quoted total, when set.
    pub final_budget: Option<Decimal>,
    pub amount_paid: Decimal,
    pub balance_due: Decimal,
    pub payment_status: PaymentStatus,
    /// Stage map, validated through the core workflow types on read.
    pub workflow_status: Json,
    pub order_completed: bool,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customers,
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
