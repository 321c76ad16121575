//! Dashboard summary reducer.
//!
//! The reducer is pure over fact rows the repository fetches: every
//! windowing and aggregation decision lives here, testable on fixed dates.
//!
//! An order counts toward the period's money figures only when its anchor
//! date (event end date, falling back to event date, falling back to
//! creation date) is on or before "today" AND inside the window — a booked
//! future wedding is not yet revenue. Quotation counts use the window
//! alone, with no has-passed gate: a quotation for next week's event still
//! shows in this month's pipeline. The recent-activity feeds are
//! unwindowed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::dashboard::window::ReportWindow;
use crate::order::{PaymentStatus, ProductionStage, WorkflowStatus, effective_budget};
use crate::quotation::QuotationStatus;

/// One order as seen by the reducer.
#[derive(Debug, Clone)]
pub struct OrderFacts {
    /// Display number (`ORD_AKP_26_0001`).
    pub order_number: String,
    /// Frozen customer name.
    pub customer_name: String,
    /// Frozen event type.
    pub event_type: String,
    /// Day the order row was created.
    pub created_on: NaiveDate,
    /// Event start date.
    pub event_date: NaiveDate,
    /// Event end date for multi-day coverage.
    pub event_end_date: Option<NaiveDate>,
    /// Quoted total.
    pub total_amount: Decimal,
    /// Negotiated budget, when set.
    pub final_budget: Option<Decimal>,
    /// Payments received.
    pub amount_paid: Decimal,
    /// Outstanding balance.
    pub balance_due: Decimal,
    /// Payment progress.
    pub payment_status: PaymentStatus,
    /// Sum of the order's expenses.
    pub total_expenses: Decimal,
    /// Production progress.
    pub workflow: WorkflowStatus,
    /// Manual completion flag.
    pub completed: bool,
}

impl OrderFacts {
    /// The date this order anchors to for windowing.
    #[must_use]
    pub fn anchor_date(&self) -> NaiveDate {
        self.event_end_date.unwrap_or(self.event_date)
    }
}

/// One quotation as seen by the reducer.
#[derive(Debug, Clone)]
pub struct QuotationFacts {
    /// Display number (`QT_AKP_26_0001`).
    pub quotation_number: String,
    /// Customer name.
    pub customer_name: String,
    /// Event type.
    pub event_type: String,
    /// Day the quotation was created.
    pub created_on: NaiveDate,
    /// Event date, when known.
    pub event_date: Option<NaiveDate>,
    /// Quoted total.
    pub total_amount: Decimal,
    /// Lifecycle status.
    pub status: QuotationStatus,
}

impl QuotationFacts {
    /// The date this quotation anchors to for windowing.
    #[must_use]
    pub fn anchor_date(&self) -> NaiveDate {
        self.event_date.unwrap_or(self.created_on)
    }
}

/// Quotation counts by lifecycle status, windowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QuotationCounts {
    /// Draft quotations.
    pub draft: usize,
    /// Sent quotations awaiting an answer.
    pub pending: usize,
    /// Accepted quotations.
    pub confirmed: usize,
    /// Turned-down quotations.
    pub declined: usize,
}

impl QuotationCounts {
    /// Sum across all statuses.
    #[must_use]
    pub fn total(&self) -> usize {
        self.draft + self.pending + self.confirmed + self.declined
    }
}

/// Completion ratio for one production stage across windowed orders.
#[derive(Debug, Clone, Serialize)]
pub struct StageProgress {
    /// Stage storage key.
    pub stage: ProductionStage,
    /// Display label.
    pub label: &'static str,
    /// Orders where the stage is done or not needed.
    pub done: usize,
    /// Windowed orders considered.
    pub total: usize,
}

/// Feed entry for a recently created order.
#[derive(Debug, Clone, Serialize)]
pub struct RecentOrder {
    /// Display number.
    pub order_number: String,
    /// Customer name.
    pub customer_name: String,
    /// Event type.
    pub event_type: String,
    /// Amount owed.
    pub total_amount: Decimal,
    /// Payment progress.
    pub payment_status: PaymentStatus,
    /// Creation date.
    pub created_on: NaiveDate,
}

/// Feed entry for a recently created quotation.
#[derive(Debug, Clone, Serialize)]
pub struct RecentQuotation {
    /// Display number.
    pub quotation_number: String,
    /// Customer name.
    pub customer_name: String,
    /// Event type.
    pub event_type: String,
    /// Quoted total.
    pub total_amount: Decimal,
    /// Lifecycle status.
    pub status: QuotationStatus,
    /// Creation date.
    pub created_on: NaiveDate,
}

/// The full dashboard payload.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    /// Orders inside the window.
    pub total_orders: usize,
    /// Windowed orders not yet marked complete.
    pub pending_orders: usize,
    /// Windowed orders marked complete.
    pub completed_orders: usize,
    /// Sum of effective budgets of windowed orders.
    pub revenue: Decimal,
    /// Sum of expenses of windowed orders.
    pub total_expenses: Decimal,
    /// Revenue minus expenses.
    pub net_profit: Decimal,
    /// Sum of positive balances of windowed orders.
    pub outstanding_balance: Decimal,
    /// Windowed quotation counts by status.
    pub quotations: QuotationCounts,
    /// Per-stage workflow completion over windowed orders.
    pub workflow_progress: Vec<StageProgress>,
    /// Five most recently created orders, unwindowed.
    pub recent_orders: Vec<RecentOrder>,
    /// Five most recently created quotations, unwindowed.
    pub recent_quotations: Vec<RecentQuotation>,
}

const RECENT_FEED_LEN: usize = 5;

/// Reduces fact rows into the dashboard summary for one window.
#[must_use]
pub fn summarize(
    today: NaiveDate,
    window: ReportWindow,
    orders: &[OrderFacts],
    quotations: &[QuotationFacts],
) -> DashboardSummary {
    let windowed: Vec<&OrderFacts> = orders
        .iter()
        .filter(|o| {
            let anchor = o.anchor_date();
            anchor <= today && window.contains(anchor, today)
        })
        .collect();

    let completed_orders = windowed.iter().filter(|o| o.completed).count();

    let mut revenue = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;
    let mut outstanding_balance = Decimal::ZERO;
    for order in &windowed {
        revenue += effective_budget(order.total_amount, order.final_budget);
        total_expenses += order.total_expenses;
        outstanding_balance += order.balance_due.max(Decimal::ZERO);
    }

    let workflow_progress = ProductionStage::ALL
        .into_iter()
        .map(|stage| StageProgress {
            stage,
            label: stage.label(),
            done: windowed
                .iter()
                .filter(|o| o.workflow.get(stage).is_done())
                .count(),
            total: windowed.len(),
        })
        .collect();

    let mut quotation_counts = QuotationCounts::default();
    for quotation in quotations {
        if !window.contains(quotation.anchor_date(), today) {
            continue;
        }
        match quotation.status {
            QuotationStatus::Draft => quotation_counts.draft += 1,
            QuotationStatus::Pending => quotation_counts.pending += 1,
            QuotationStatus::Confirmed => quotation_counts.confirmed += 1,
            QuotationStatus::Declined => quotation_counts.declined += 1,
        }
    }

    DashboardSummary {
        total_orders: windowed.len(),
        pending_orders: windowed.len() - completed_orders,
        completed_orders,
        revenue,
        total_expenses,
        net_profit: revenue - total_expenses,
        outstanding_balance,
        quotations: quotation_counts,
        workflow_progress,
        recent_orders: recent_orders(orders),
        recent_quotations: recent_quotations(quotations),
    }
}

fn recent_orders(orders: &[OrderFacts]) -> Vec<RecentOrder> {
    let mut sorted: Vec<&OrderFacts> = orders.iter().collect();
    sorted.sort_by(|a, b| b.created_on.cmp(&a.created_on));
    sorted
        .into_iter()
        .take(RECENT_FEED_LEN)
        .map(|o| RecentOrder {
            order_number: o.order_number.clone(),
            customer_name: o.customer_name.clone(),
            event_type: o.event_type.clone(),
            total_amount: o.total_amount,
            payment_status: o.payment_status,
            created_on: o.created_on,
        })
        .collect()
}

fn recent_quotations(quotations: &[QuotationFacts]) -> Vec<RecentQuotation> {
    let mut sorted: Vec<&QuotationFacts> = quotations.iter().collect();
    sorted.sort_by(|a, b| b.created_on.cmp(&a.created_on));
    sorted
        .into_iter()
        .take(RECENT_FEED_LEN)
        .map(|q| RecentQuotation {
            quotation_number: q.quotation_number.clone(),
            customer_name: q.customer_name.clone(),
            event_type: q.event_type.clone(),
            total_amount: q.total_amount,
            status: q.status,
            created_on: q.created_on,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{StageStatus, WorkflowStatus};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn order(number: &str, event_end: NaiveDate) -> OrderFacts {
        OrderFacts {
            order_number: number.to_string(),
            customer_name: "Meera Iyer".to_string(),
            event_type: "Wedding".to_string(),
            created_on: date(2026, 7, 1),
            event_date: event_end,
            event_end_date: Some(event_end),
            total_amount: dec!(100000),
            final_budget: None,
            amount_paid: dec!(40000),
            balance_due: dec!(60000),
            payment_status: PaymentStatus::Partial,
            total_expenses: dec!(25000),
            workflow: WorkflowStatus::new(),
            completed: false,
        }
    }

    fn quotation(number: &str, status: QuotationStatus, event: NaiveDate) -> QuotationFacts {
        QuotationFacts {
            quotation_number: number.to_string(),
            customer_name: "Meera Iyer".to_string(),
            event_type: "Engagement".to_string(),
            created_on: date(2026, 7, 15),
            event_date: Some(event),
            total_amount: dec!(30000),
            status,
        }
    }

    const TODAY: (i32, u32, u32) = (2026, 8, 25);

    fn today() -> NaiveDate {
        date(TODAY.0, TODAY.1, TODAY.2)
    }

    #[test]
    fn test_future_event_in_window_excluded() {
        // Event end inside ThisMonth but after today: booked, not yet revenue.
        let orders = vec![
            order("ORD_AKP_26_0001", date(2026, 8, 10)),
            order("ORD_AKP_26_0002", date(2026, 8, 30)),
        ];
        let summary = summarize(today(), ReportWindow::ThisMonth, &orders, &[]);
        assert_eq!(summary.total_orders, 1);
        assert_eq!(summary.revenue, dec!(100000));
    }

    #[test]
    fn test_anchor_falls_back_to_event_date() {
        let mut o = order("ORD_AKP_26_0003", date(2026, 8, 12));
        o.event_end_date = None;
        assert_eq!(o.anchor_date(), date(2026, 8, 12));
        let summary = summarize(today(), ReportWindow::ThisMonth, &[o], &[]);
        assert_eq!(summary.total_orders, 1);
    }

    #[test]
    fn test_money_rollups() {
        let mut paid = order("ORD_AKP_26_0004", date(2026, 8, 5));
        paid.final_budget = Some(dec!(90000));
        paid.amount_paid = dec!(95000);
        paid.balance_due = dec!(-5000);
        paid.payment_status = PaymentStatus::Paid;
        paid.completed = true;

        let open = order("ORD_AKP_26_0005", date(2026, 8, 10));

        let summary = summarize(today(), ReportWindow::ThisMonth, &[paid, open], &[]);
        assert_eq!(summary.revenue, dec!(190000));
        assert_eq!(summary.total_expenses, dec!(50000));
        assert_eq!(summary.net_profit, dec!(140000));
        // Overpayment does not offset another order's balance.
        assert_eq!(summary.outstanding_balance, dec!(60000));
        assert_eq!(summary.completed_orders, 1);
        assert_eq!(summary.pending_orders, 1);
    }

    #[test]
    fn test_workflow_ratios_over_windowed_orders() {
        let mut done = order("ORD_AKP_26_0006", date(2026, 8, 5));
        done.workflow.set(ProductionStage::PhotoSelection, StageStatus::Yes);
        done.workflow.set(ProductionStage::OutdoorShoot, StageStatus::NotNeeded);
        let fresh = order("ORD_AKP_26_0007", date(2026, 8, 10));

        let summary = summarize(today(), ReportWindow::ThisMonth, &[done, fresh], &[]);
        let photo = summary
            .workflow_progress
            .iter()
            .find(|p| p.stage == ProductionStage::PhotoSelection)
            .unwrap();
        assert_eq!((photo.done, photo.total), (1, 2));
        let outdoor = summary
            .workflow_progress
            .iter()
            .find(|p| p.stage == ProductionStage::OutdoorShoot)
            .unwrap();
        assert_eq!((outdoor.done, outdoor.total), (1, 2));
    }

    #[test]
    fn test_quotation_counts_by_status() {
        let quotations = vec![
            quotation("QT_AKP_26_0001", QuotationStatus::Draft, date(2026, 8, 5)),
            quotation("QT_AKP_26_0002", QuotationStatus::Pending, date(2026, 8, 6)),
            quotation("QT_AKP_26_0003", QuotationStatus::Confirmed, date(2026, 8, 7)),
            quotation("QT_AKP_26_0004", QuotationStatus::Declined, date(2026, 8, 8)),
            // Outside the window.
            quotation("QT_AKP_26_0005", QuotationStatus::Draft, date(2026, 6, 1)),
        ];
        let summary = summarize(today(), ReportWindow::ThisMonth, &[], &quotations);
        assert_eq!(summary.quotations.draft, 1);
        assert_eq!(summary.quotations.pending, 1);
        assert_eq!(summary.quotations.confirmed, 1);
        assert_eq!(summary.quotations.declined, 1);
        assert_eq!(summary.quotations.total(), 4);
    }

    #[test]
    fn test_quotation_for_upcoming_event_still_counts() {
        // Unlike orders, quotations carry no has-passed gate: an event
        // later this month is already in the pipeline today.
        let quotations = vec![quotation(
            "QT_AKP_26_0006",
            QuotationStatus::Pending,
            date(2026, 8, 30),
        )];
        let summary = summarize(today(), ReportWindow::ThisMonth, &[], &quotations);
        assert_eq!(summary.quotations.pending, 1);

        // The matching order would still be excluded until the event ends.
        let orders = vec![order("ORD_AKP_26_0009", date(2026, 8, 30))];
        let summary = summarize(today(), ReportWindow::ThisMonth, &orders, &[]);
        assert_eq!(summary.total_orders, 0);
    }

    #[test]
    fn test_recent_feeds_are_unwindowed_and_capped() {
        let mut orders = Vec::new();
        for day in 1..=8 {
            let mut o = order(&format!("ORD_AKP_26_{day:04}"), date(2026, 3, day));
            o.created_on = date(2026, 3, day);
            orders.push(o);
        }
        let summary = summarize(today(), ReportWindow::ThisMonth, &orders, &[]);
        // March events are outside ThisMonth, but the feed still shows them.
        assert_eq!(summary.total_orders, 0);
        assert_eq!(summary.recent_orders.len(), 5);
        assert_eq!(summary.recent_orders[0].order_number, "ORD_AKP_26_0008");
    }

    #[test]
    fn test_empty_facts_produce_zeroed_summary() {
        let summary = summarize(today(), ReportWindow::ThisYear, &[], &[]);
        assert_eq!(summary.total_orders, 0);
        assert_eq!(summary.revenue, Decimal::ZERO);
        assert_eq!(summary.net_profit, Decimal::ZERO);
        assert!(summary.recent_orders.is_empty());
        for progress in &summary.workflow_progress {
            assert_eq!((progress.done, progress.total), (0, 0));
        }
    }
}
