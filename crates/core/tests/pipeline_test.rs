//! End-to-end walk through the studio pipeline, database-free:
//! price a quotation, send and confirm it, pay the order off in
//! installments, track production, and read the dashboard.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use aperture_core::dashboard::{OrderFacts, QuotationFacts, ReportWindow, summarize};
use aperture_core::numbering::{DocumentKind, format_number, two_digit_year};
use aperture_core::order::{
    FinancialSnapshot, PaymentStatus, ProductionStage, StageStatus, WorkflowStatus,
};
use aperture_core::pricing::{Discount, PriceBreakdown, PricedLine};
use aperture_core::quotation::{
    ItemCategory, LifecycleAction, QuotationData, QuotationItemData, QuotationService,
    QuotationStatus, ServiceDetails, build_order,
};
use aperture_shared::types::{CustomerId, QuotationId, QuotationItemId};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_quotation_to_dashboard_pipeline() {
    let today = date(2026, 8, 25);

    // Price a three-line wedding quotation with a 10% discount.
    let lines = [
        PricedLine { quantity: 2, unit_price: dec!(35000) },
        PricedLine { quantity: 1, unit_price: dec!(40000) },
        PricedLine { quantity: 1, unit_price: dec!(20000) },
    ];
    let breakdown = PriceBreakdown::compute(&lines, Discount::Percent(dec!(10)));
    assert_eq!(breakdown.subtotal, dec!(130000));
    assert_eq!(breakdown.discount_amount, dec!(13000));
    assert_eq!(breakdown.total, dec!(117000));

    // Number and send the quotation.
    let created_on = date(2026, 7, 20);
    let quotation_number =
        format_number(DocumentKind::Quotation, "AKP", two_digit_year(created_on), 12);
    assert_eq!(quotation_number, "QT_AKP_26_0012");

    let mut status = QuotationStatus::Draft;
    let action = QuotationService::mark_pending(status).unwrap();
    status = action.new_status();
    assert_eq!(status, QuotationStatus::Pending);

    // Customer accepts: build the frozen order snapshot.
    let action = QuotationService::confirm(status).unwrap();
    assert!(matches!(action, LifecycleAction::Confirm { .. }));
    status = action.new_status();

    let quotation = QuotationData {
        id: QuotationId::new(),
        customer_id: CustomerId::new(),
        customer_name: "Kavya Menon".to_string(),
        customer_phone: "9876543210".to_string(),
        event_type: "Wedding".to_string(),
        event_date: date(2026, 8, 14),
        event_end_date: Some(date(2026, 8, 16)),
        venue: Some("Palace Grounds".to_string()),
        city: Some("Bengaluru".to_string()),
        package: None,
        details: ServiceDetails {
            photo_type: Some("Candid".to_string()),
            camera_count: Some(2),
            album_count: Some(1),
            ..ServiceDetails::default()
        },
        subtotal: breakdown.subtotal,
        discount_amount: breakdown.discount_amount,
        total_amount: breakdown.total,
        notes: None,
    };
    let items: Vec<QuotationItemData> = [
        (ItemCategory::Photography, "Candid photography, 2 days", 2, dec!(35000)),
        (ItemCategory::Videography, "Traditional video", 1, dec!(40000)),
        (ItemCategory::Album, "Premium album", 1, dec!(20000)),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (category, description, quantity, unit_price))| QuotationItemData {
        id: QuotationItemId::new(),
        category,
        description: description.to_string(),
        quantity,
        unit_price,
        total_price: unit_price * Decimal::from(quantity),
        position: i32::try_from(i).unwrap() + 1,
    })
    .collect();

    let order_number = format_number(DocumentKind::Order, "AKP", two_digit_year(today), 3);
    let order = build_order(order_number, &quotation, &items);
    assert_eq!(order.items.len(), 3);
    assert_eq!(order.balance_due, dec!(117000));
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert_eq!(order.details, quotation.details);

    // The confirmed quotation is now immutable.
    assert!(QuotationService::confirm(status).is_err());
    assert!(QuotationService::ensure_editable(status).is_err());
    assert!(QuotationService::ensure_deletable(status).is_err());

    // Advance payment, then settlement.
    let after_advance = FinancialSnapshot::compute(order.total_amount, None, dec!(50000));
    assert_eq!(after_advance.payment_status, PaymentStatus::Partial);
    assert_eq!(after_advance.balance_due, dec!(67000));

    let settled = FinancialSnapshot::compute(order.total_amount, None, dec!(117000));
    assert_eq!(settled.payment_status, PaymentStatus::Paid);
    assert_eq!(settled.balance_due, Decimal::ZERO);

    // Production moves along.
    let mut workflow = WorkflowStatus::new();
    workflow.set(ProductionStage::PhotoSelection, StageStatus::Yes);
    workflow.set(ProductionStage::OutdoorShoot, StageStatus::NotNeeded);
    assert_eq!(workflow.completion_count(), 2);
    assert!(!workflow.is_complete());

    // The dashboard sees the order: the event ended before today, so it
    // counts toward this month's money figures.
    let order_facts = OrderFacts {
        order_number: order.order_number.clone(),
        customer_name: order.customer_name.clone(),
        event_type: order.event_type.clone(),
        created_on: today,
        event_date: order.event_date,
        event_end_date: order.event_end_date,
        total_amount: order.total_amount,
        final_budget: None,
        amount_paid: settled.amount_paid,
        balance_due: settled.balance_due,
        payment_status: settled.payment_status,
        total_expenses: dec!(30000),
        workflow,
        completed: false,
    };
    let quotation_facts = QuotationFacts {
        quotation_number,
        customer_name: quotation.customer_name.clone(),
        event_type: quotation.event_type.clone(),
        created_on,
        event_date: Some(quotation.event_date),
        total_amount: quotation.total_amount,
        status,
    };

    let summary = summarize(
        today,
        ReportWindow::ThisMonth,
        std::slice::from_ref(&order_facts),
        std::slice::from_ref(&quotation_facts),
    );
    assert_eq!(summary.total_orders, 1);
    assert_eq!(summary.revenue, dec!(117000));
    assert_eq!(summary.net_profit, dec!(87000));
    assert_eq!(summary.outstanding_balance, Decimal::ZERO);
    assert_eq!(summary.quotations.confirmed, 1);
    assert_eq!(summary.recent_orders[0].order_number, order.order_number);
}
