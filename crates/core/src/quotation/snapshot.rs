//! Order snapshot built at confirmation time.
//!
//! Confirming a quotation freezes its customer, event, and pricing fields
//! onto a new order. The order keeps a back-reference to the quotation but
//! never reads through it afterwards, so later edits to customer records
//! cannot rewrite history on the order.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use aperture_shared::types::{CustomerId, OrderId, OrderItemId, QuotationId, QuotationItemId};

use crate::order::{FinancialSnapshot, PaymentStatus, WorkflowStatus};
use crate::quotation::types::ItemCategory;

/// Primary-service coverage and deliverables captured on a quotation.
///
/// These are intake-form details for the quotation document; pricing
/// never reads them. All fields are optional and copied verbatim onto
/// the order at confirmation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceDetails {
    /// Photography coverage type (candid, traditional, ...).
    pub photo_type: Option<String>,
    /// Videography coverage type.
    pub video_type: Option<String>,
    /// Coverage area or region.
    pub area: Option<String>,
    /// Cameras on the primary service.
    pub camera_count: Option<i32>,
    /// Negotiated per-session or per-day rate.
    pub rate: Option<Decimal>,
    /// Session label (full day, half day, ...).
    pub session: Option<String>,
    /// Albums promised.
    pub album_count: Option<i32>,
    /// Sheets per album.
    pub album_sheets: Option<i32>,
    /// Photos per album.
    pub album_photos: Option<i32>,
    /// Album size label.
    pub album_size: Option<String>,
    /// Mini-books promised.
    pub mini_books: Option<i32>,
    /// Calendars promised.
    pub calendars: Option<i32>,
    /// Frames promised.
    pub frames: Option<i32>,
}

/// The quotation fields frozen onto an order at confirmation.
#[derive(Debug, Clone)]
pub struct QuotationData {
    /// Quotation being confirmed.
    pub id: QuotationId,
    /// Customer the quotation was issued to.
    pub customer_id: CustomerId,
    /// Customer name at confirmation time.
    pub customer_name: String,
    /// Customer phone at confirmation time.
    pub customer_phone: String,
    /// Event type (wedding, engagement, ...).
    pub event_type: String,
    /// First day of the event.
    pub event_date: NaiveDate,
    /// Last day of the event, for multi-day coverage.
    pub event_end_date: Option<NaiveDate>,
    /// Venue name.
    pub venue: Option<String>,
    /// Venue city.
    pub city: Option<String>,
    /// Package name, when the quotation was built from one.
    pub package: Option<String>,
    /// Coverage and deliverable details.
    pub details: ServiceDetails,
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// Discount applied to the subtotal.
    pub discount_amount: Decimal,
    /// Amount the customer owes.
    pub total_amount: Decimal,
    /// Free-form notes carried onto the order.
    pub notes: Option<String>,
}

/// One quotation line item as input to the snapshot.
#[derive(Debug, Clone)]
pub struct QuotationItemData {
    /// Source line item.
    pub id: QuotationItemId,
    /// Line category.
    pub category: ItemCategory,
    /// Service description.
    pub description: String,
    /// Units ordered.
    pub quantity: i32,
    /// Price per unit.
    pub unit_price: Decimal,
    /// quantity × unit price, as priced on the quotation.
    pub total_price: Decimal,
    /// Display position on the document.
    pub position: i32,
}

/// A new order ready for insertion.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    /// Allocated order number.
    pub order_number: String,
    /// Back-reference to the confirmed quotation.
    pub quotation_id: QuotationId,
    /// Customer the order belongs to.
    pub customer_id: CustomerId,
    /// Frozen customer name.
    pub customer_name: String,
    /// Frozen customer phone.
    pub customer_phone: String,
    /// Frozen event type.
    pub event_type: String,
    /// Frozen event start date.
    pub event_date: NaiveDate,
    /// Frozen event end date.
    pub event_end_date: Option<NaiveDate>,
    /// Frozen venue.
    pub venue: Option<String>,
    /// Frozen city.
    pub city: Option<String>,
    /// Frozen package name.
    pub package: Option<String>,
    /// Frozen coverage and deliverable details.
    pub details: ServiceDetails,
    /// Frozen subtotal.
    pub subtotal: Decimal,
    /// Frozen discount.
    pub discount_amount: Decimal,
    /// Frozen total.
    pub total_amount: Decimal,
    /// Payments received so far (zero at confirmation).
    pub amount_paid: Decimal,
    /// Outstanding balance (the full total at confirmation).
    pub balance_due: Decimal,
    /// Payment progress.
    pub payment_status: PaymentStatus,
    /// Production progress, all stages unstarted.
    pub workflow_status: WorkflowStatus,
    /// Manual completion flag.
    pub order_completed: bool,
    /// Notes carried from the quotation.
    pub notes: Option<String>,
    /// Line items cloned pairwise from the quotation.
    pub items: Vec<OrderItemDraft>,
}

/// One order line item cloned from a quotation line item.
#[derive(Debug, Clone)]
pub struct OrderItemDraft {
    /// Freshly allocated item id.
    pub id: OrderItemId,
    /// Source quotation line item.
    pub quotation_item_id: QuotationItemId,
    /// Line category.
    pub category: ItemCategory,
    /// Service description.
    pub description: String,
    /// Units ordered.
    pub quantity: i32,
    /// Price per unit.
    pub unit_price: Decimal,
    /// quantity × unit price.
    pub total_price: Decimal,
    /// Display position, preserved from the quotation.
    pub position: i32,
}

/// Builds the order an accepted quotation spawns.
///
/// Pricing is copied verbatim, not recomputed: the order owes exactly what
/// the customer accepted. Items are cloned one-for-one in quotation order.
#[must_use]
pub fn build_order(
    order_number: String,
    quotation: &QuotationData,
    items: &[QuotationItemData],
) -> OrderDraft {
    let items = items
        .iter()
        .map(|item| OrderItemDraft {
            id: OrderItemId::new(),
            quotation_item_id: item.id,
            category: item.category,
            description: item.description.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            total_price: item.total_price,
            position: item.position,
        })
        .collect();

    OrderDraft {
        order_number,
        quotation_id: quotation.id,
        customer_id: quotation.customer_id,
        customer_name: quotation.customer_name.clone(),
        customer_phone: quotation.customer_phone.clone(),
        event_type: quotation.event_type.clone(),
        event_date: quotation.event_date,
        event_end_date: quotation.event_end_date,
        venue: quotation.venue.clone(),
        city: quotation.city.clone(),
        package: quotation.package.clone(),
        details: quotation.details.clone(),
        subtotal: quotation.subtotal,
        discount_amount: quotation.discount_amount,
        total_amount: quotation.total_amount,
        amount_paid: Decimal::ZERO,
        balance_due: quotation.total_amount,
        payment_status: FinancialSnapshot::compute(quotation.total_amount, None, Decimal::ZERO)
            .payment_status,
        workflow_status: WorkflowStatus::new(),
        order_completed: false,
        notes: quotation.notes.clone(),
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_quotation() -> QuotationData {
        QuotationData {
            id: QuotationId::new(),
            customer_id: CustomerId::new(),
            customer_name: "Ananya Rao".to_string(),
            customer_phone: "919876543210".to_string(),
            event_type: "Wedding".to_string(),
            event_date: NaiveDate::from_ymd_opt(2026, 11, 20).unwrap(),
            event_end_date: Some(NaiveDate::from_ymd_opt(2026, 11, 22).unwrap()),
            venue: Some("Lakeside Gardens".to_string()),
            city: Some("Hyderabad".to_string()),
            package: Some("Premium Wedding".to_string()),
            details: ServiceDetails {
                photo_type: Some("Candid".to_string()),
                video_type: Some("Cinematic".to_string()),
                camera_count: Some(2),
                session: Some("Full day".to_string()),
                album_count: Some(1),
                album_sheets: Some(40),
                ..ServiceDetails::default()
            },
            subtotal: dec!(150000),
            discount_amount: dec!(15000),
            total_amount: dec!(135000),
            notes: Some("Two candid photographers".to_string()),
        }
    }

    fn sample_items() -> Vec<QuotationItemData> {
        vec![
            QuotationItemData {
                id: QuotationItemId::new(),
                category: ItemCategory::Photography,
                description: "Candid photography, 3 days".to_string(),
                quantity: 3,
                unit_price: dec!(30000),
                total_price: dec!(90000),
                position: 1,
            },
            QuotationItemData {
                id: QuotationItemId::new(),
                category: ItemCategory::Videography,
                description: "Traditional video".to_string(),
                quantity: 1,
                unit_price: dec!(40000),
                total_price: dec!(40000),
                position: 2,
            },
            QuotationItemData {
                id: QuotationItemId::new(),
                category: ItemCategory::Album,
                description: "Premium album 40 sheets".to_string(),
                quantity: 1,
                unit_price: dec!(20000),
                total_price: dec!(20000),
                position: 3,
            },
        ]
    }

    #[test]
    fn test_order_clones_every_item_pairwise() {
        let quotation = sample_quotation();
        let items = sample_items();
        let order = build_order("ORD_AKP_26_0001".to_string(), &quotation, &items);

        assert_eq!(order.items.len(), items.len());
        for (source, cloned) in items.iter().zip(&order.items) {
            assert_eq!(cloned.quotation_item_id, source.id);
            assert_eq!(cloned.description, source.description);
            assert_eq!(cloned.quantity, source.quantity);
            assert_eq!(cloned.unit_price, source.unit_price);
            assert_eq!(cloned.total_price, source.total_price);
            assert_eq!(cloned.position, source.position);
        }
    }

    #[test]
    fn test_order_freezes_pricing_verbatim() {
        let quotation = sample_quotation();
        let order = build_order("ORD_AKP_26_0002".to_string(), &quotation, &sample_items());

        assert_eq!(order.subtotal, quotation.subtotal);
        assert_eq!(order.discount_amount, quotation.discount_amount);
        assert_eq!(order.total_amount, quotation.total_amount);
        assert_eq!(order.quotation_id, quotation.id);
    }

    #[test]
    fn test_order_copies_service_details_verbatim() {
        let quotation = sample_quotation();
        let order = build_order("ORD_AKP_26_0005".to_string(), &quotation, &sample_items());
        assert_eq!(order.details, quotation.details);
        assert_eq!(order.details.camera_count, Some(2));
        assert_eq!(order.details.album_sheets, Some(40));
    }

    #[test]
    fn test_new_order_starts_unpaid_and_unstarted() {
        let order = build_order(
            "ORD_AKP_26_0003".to_string(),
            &sample_quotation(),
            &sample_items(),
        );

        assert_eq!(order.amount_paid, Decimal::ZERO);
        assert_eq!(order.balance_due, order.total_amount);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.workflow_status.completion_count(), 0);
        assert!(!order.order_completed);
    }

    #[test]
    fn test_item_ids_are_fresh() {
        let items = sample_items();
        let order = build_order("ORD_AKP_26_0004".to_string(), &sample_quotation(), &items);
        for (source, cloned) in items.iter().zip(&order.items) {
            assert_ne!(cloned.id.into_inner(), source.id.into_inner());
        }
    }
}
