//! Quotation lifecycle: state machine, actions, and order snapshots.

pub mod error;
pub mod service;
pub mod snapshot;
pub mod types;

pub use error::QuotationError;
pub use service::QuotationService;
pub use snapshot::{
    OrderDraft, OrderItemDraft, QuotationData, QuotationItemData, ServiceDetails, build_order,
};
pub use types::{ItemCategory, LifecycleAction, QuotationStatus};
