//! `SeaORM` Entity for the quotations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::QuotationStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "quotations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub quotation_number: String,
    pub customer_id: Uuid,
    pub event_type: String,
    pub event_date: Date,
    pub event_end_date: Option<Date>,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub package: Option<String>,
    // Primary-service coverage details off the intake form
    pub photo_type: Option<String>,
    pub video_type: Option<String>,
    pub area: Option<String>,
    pub camera_count: Option<i32>,
    pub rate: Option<Decimal>,
    pub session: Option<String>,
    // Promised deliverables
    pub album_count: Option<i32>,
    pub album_sheets: Option<i32>,
    pub album_photos: Option<i32>,
    pub album_size: Option<String>,
    pub mini_books: Option<i32>,
    pub calendars: Option<i32>,
    pub frames: Option<i32>,
    pub status: QuotationStatus,
    pub subtotal: Decimal,
    /// None while a manual discount override is in force.
    pub discount_percent: Option<Decimal>,
    pub discount_amount: Decimal,
    /// Kept for the books; no calculation reads it.
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub valid_until: Date,
    pub notes: Option<String>,
    /// Set when the quotation is confirmed and spawns an order.
    pub order_id: Option<Uuid>,
    pub confirmed_at: Option<DateTimeWithTimeZone>,
    pub declined_at: Option<DateTimeWithTimeZone>,
    pub decline_reason: Option<String>,
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
    #[sea_orm(has_many = "super::quotation_items::Entity")]
    QuotationItems,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::quotation_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuotationItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
