//! Order financial rollups.
//!
//! Payment status, balance due, and profit are derived quantities: they
//! are recomputed from the order's payments and expenses inside the same
//! transaction as any write that affects them, never edited directly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use aperture_shared::types::money::round_amount;

/// How far along an order's payments are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing received yet.
    Pending,
    /// Some money received, balance outstanding.
    Partial,
    /// Balance cleared.
    Paid,
}

impl PaymentStatus {
    /// Returns the storage representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Partial => "partial",
            Self::Paid => "paid",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "partial" => Some(Self::Partial),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derived payment figures for one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinancialSnapshot {
    /// Sum of all recorded payments.
    pub amount_paid: Decimal,
    /// Effective budget minus amount paid (can go negative on overpayment).
    pub balance_due: Decimal,
    /// Status derived from the balance.
    pub payment_status: PaymentStatus,
}

impl FinancialSnapshot {
    /// Recomputes the snapshot from the order's pricing and payment total.
    ///
    /// `final_budget`, when set, replaces the quoted total as the amount the
    /// customer actually owes (negotiated after confirmation).
    #[must_use]
    pub fn compute(
        total_amount: Decimal,
        final_budget: Option<Decimal>,
        amount_paid: Decimal,
    ) -> Self {
        let budget = effective_budget(total_amount, final_budget);
        let balance_due = budget - amount_paid;

        // Status follows the balance alone: a zero-budget order is Paid
        // from the start, it owes nothing.
        let payment_status = if balance_due <= Decimal::ZERO {
            PaymentStatus::Paid
        } else if amount_paid > Decimal::ZERO {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Pending
        };

        Self {
            amount_paid,
            balance_due,
            payment_status,
        }
    }
}

/// The amount the customer owes: the negotiated final budget when one has
/// been set, otherwise the quoted total.
#[must_use]
pub fn effective_budget(total_amount: Decimal, final_budget: Option<Decimal>) -> Decimal {
    final_budget.unwrap_or(total_amount)
}

/// Profit for one order: what the customer owes minus what the order cost.
#[must_use]
pub fn profit(
    total_amount: Decimal,
    final_budget: Option<Decimal>,
    total_expenses: Decimal,
) -> Decimal {
    round_amount(effective_budget(total_amount, final_budget) - total_expenses)
}

/// Post-production expense categories.
///
/// Expenses in these categories are studio-internal production costs and
/// never attribute to a service line item, even when linked to one.
pub const POST_PRODUCTION_CATEGORIES: [&str; 8] = [
    "Album Designing",
    "Album Printing",
    "Traditional Video Editing",
    "Candid Video Editing",
    "Photo Retouching",
    "Invitation Video",
    "Advertisement Video",
    "Miscellaneous",
];

/// True when `category` names a post-production cost.
#[must_use]
pub fn is_post_production(category: &str) -> bool {
    let trimmed = category.trim();
    POST_PRODUCTION_CATEGORIES
        .iter()
        .any(|c| c.eq_ignore_ascii_case(trimmed))
}

/// One expense as seen by the cost split.
#[derive(Debug, Clone)]
pub struct ExpenseLine {
    /// Free-text or vocabulary category.
    pub category: String,
    /// Whether the expense is linked to an order line item.
    pub linked_to_item: bool,
    /// Expense amount.
    pub amount: Decimal,
}

/// Expenses partitioned into service costs and post-production costs.
///
/// Every expense lands in exactly one bucket: post-production categories
/// win over an item link, and unlinked non-vocabulary expenses count as
/// post-production overhead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ExpenseSplit {
    /// Costs attributed to delivered service line items.
    pub service: Decimal,
    /// Studio-internal production costs.
    pub post_production: Decimal,
}

impl ExpenseSplit {
    /// Partitions a set of expenses.
    #[must_use]
    pub fn compute<'a, I>(expenses: I) -> Self
    where
        I: IntoIterator<Item = &'a ExpenseLine>,
    {
        let mut split = Self::default();
        for expense in expenses {
            if !is_post_production(&expense.category) && expense.linked_to_item {
                split.service += expense.amount;
            } else {
                split.post_production += expense.amount;
            }
        }
        split
    }

    /// Total across both buckets.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.service + self.post_production
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn expense(category: &str, linked: bool, amount: Decimal) -> ExpenseLine {
        ExpenseLine {
            category: category.to_string(),
            linked_to_item: linked,
            amount,
        }
    }

    #[test]
    fn test_no_payments_is_pending() {
        let snapshot = FinancialSnapshot::compute(dec!(50000), None, Decimal::ZERO);
        assert_eq!(snapshot.payment_status, PaymentStatus::Pending);
        assert_eq!(snapshot.balance_due, dec!(50000));
    }

    #[test]
    fn test_partial_payment() {
        let snapshot = FinancialSnapshot::compute(dec!(50000), None, dec!(20000));
        assert_eq!(snapshot.payment_status, PaymentStatus::Partial);
        assert_eq!(snapshot.balance_due, dec!(30000));
    }

    #[test]
    fn test_exact_payment_is_paid() {
        let snapshot = FinancialSnapshot::compute(dec!(50000), None, dec!(50000));
        assert_eq!(snapshot.payment_status, PaymentStatus::Paid);
        assert_eq!(snapshot.balance_due, Decimal::ZERO);
    }

    #[test]
    fn test_overpayment_is_paid_with_negative_balance() {
        let snapshot = FinancialSnapshot::compute(dec!(50000), None, dec!(55000));
        assert_eq!(snapshot.payment_status, PaymentStatus::Paid);
        assert_eq!(snapshot.balance_due, dec!(-5000));
    }

    #[test]
    fn test_final_budget_overrides_quoted_total() {
        let snapshot = FinancialSnapshot::compute(dec!(50000), Some(dec!(45000)), dec!(45000));
        assert_eq!(snapshot.payment_status, PaymentStatus::Paid);
        assert_eq!(snapshot.balance_due, Decimal::ZERO);
    }

    #[test]
    fn test_lowering_budget_below_paid_flips_to_paid() {
        // Budget renegotiated down after a partial payment.
        let snapshot = FinancialSnapshot::compute(dec!(50000), Some(dec!(20000)), dec!(20000));
        assert_eq!(snapshot.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn test_zero_budget_order_is_paid_without_payments() {
        let snapshot = FinancialSnapshot::compute(Decimal::ZERO, None, Decimal::ZERO);
        assert_eq!(snapshot.payment_status, PaymentStatus::Paid);
        assert_eq!(snapshot.balance_due, Decimal::ZERO);

        // A complimentary order via a waived final budget behaves the same.
        let waived = FinancialSnapshot::compute(dec!(30000), Some(Decimal::ZERO), Decimal::ZERO);
        assert_eq!(waived.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn test_profit_uses_effective_budget() {
        assert_eq!(profit(dec!(50000), None, dec!(18000)), dec!(32000));
        assert_eq!(profit(dec!(50000), Some(dec!(45000)), dec!(18000)), dec!(27000));
    }

    #[test]
    fn test_profit_can_go_negative() {
        assert_eq!(profit(dec!(10000), None, dec!(12500)), dec!(-2500));
    }

    #[test]
    fn test_post_production_vocabulary() {
        assert!(is_post_production("Album Designing"));
        assert!(is_post_production("  photo retouching "));
        assert!(!is_post_production("Candid Photography"));
    }

    #[test]
    fn test_expense_split_no_double_counting() {
        let expenses = [
            expense("Candid Photography", true, dec!(8000)),
            expense("Album Printing", true, dec!(3000)),
            expense("Travel", false, dec!(1500)),
            expense("Miscellaneous", false, dec!(500)),
        ];
        let split = ExpenseSplit::compute(&expenses);
        // Vocabulary categories stay post-production even when item-linked;
        // unlinked free-text expenses fall into post-production overhead.
        assert_eq!(split.service, dec!(8000));
        assert_eq!(split.post_production, dec!(5000));
        assert_eq!(split.total(), dec!(13000));
    }

    #[test]
    fn test_empty_expense_split() {
        let split = ExpenseSplit::compute(&[]);
        assert_eq!(split.total(), Decimal::ZERO);
    }

    proptest! {
        /// Paying in any sequence of installments, the running balance is
        /// always the effective budget minus the sum paid so far, and the
        /// status follows the balance.
        #[test]
        fn prop_balance_tracks_installments(
            budget in 1u32..=10_000_000,
            installments in proptest::collection::vec(1u32..=1_000_000, 0..12),
        ) {
            let budget = Decimal::from(budget);
            let mut paid = Decimal::ZERO;
            for installment in installments {
                paid += Decimal::from(installment);
                let snapshot = FinancialSnapshot::compute(budget, None, paid);
                prop_assert_eq!(snapshot.balance_due, budget - paid);
                if paid >= budget {
                    prop_assert_eq!(snapshot.payment_status, PaymentStatus::Paid);
                } else {
                    prop_assert_eq!(snapshot.payment_status, PaymentStatus::Partial);
                }
            }
        }

        /// The two expense buckets always partition the total.
        #[test]
        fn prop_split_partitions_total(
            amounts in proptest::collection::vec((0u8..=9, any::<bool>(), 1u32..=100_000), 0..20),
        ) {
            let categories = [
                "Album Designing", "Album Printing", "Traditional Video Editing",
                "Candid Video Editing", "Photo Retouching", "Invitation Video",
                "Advertisement Video", "Miscellaneous", "Travel", "Candid Photography",
            ];
            let expenses: Vec<ExpenseLine> = amounts
                .into_iter()
                .map(|(idx, linked, amount)| ExpenseLine {
                    category: categories[idx as usize].to_string(),
                    linked_to_item: linked,
                    amount: Decimal::from(amount),
                })
                .collect();
            let split = ExpenseSplit::compute(&expenses);
            let total: Decimal = expenses.iter().map(|e| e.amount).sum();
            prop_assert_eq!(split.total(), total);
        }
    }
}
