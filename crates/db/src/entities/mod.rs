//! `SeaORM` entity definitions.

pub mod customers;
pub mod document_counters;
pub mod expenses;
pub mod order_items;
pub mod orders;
pub mod payments;
pub mod quotation_items;
pub mod quotations;
pub mod sea_orm_active_enums;
