//! Pricing calculations for quotations and orders.
//!
//! Pure functions over line items and a discount: no clamping, no currency
//! conversion. Zero and negative line amounts are permitted; validation of
//! user input happens at the API boundary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use aperture_shared::types::money::round_amount;

/// A priced line on a quotation or order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedLine {
    /// Quantity.
    pub quantity: i32,
    /// Price per unit, whole rupees.
    pub unit_price: Decimal,
}

impl PricedLine {
    /// Returns `quantity * unit_price`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// How the discount is determined.
///
/// A percentage computes `round(subtotal * percent / 100)`. A manual
/// override is applied verbatim and stays in force until the percentage
/// is next changed; an override never re-links to the percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Discount {
    /// Discount derived from a percentage of the subtotal.
    Percent(Decimal),
    /// Manually entered discount amount (last write wins).
    Override(Decimal),
}

/// Computed price breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Sum of all line totals.
    pub subtotal: Decimal,
    /// Effective discount amount.
    pub discount_amount: Decimal,
    /// `subtotal - discount_amount`.
    pub total: Decimal,
}

impl PriceBreakdown {
    /// Computes the breakdown for a set of lines and a discount.
    #[must_use]
    pub fn compute(lines: &[PricedLine], discount: Discount) -> Self {
        let subtotal: Decimal = lines.iter().map(PricedLine::line_total).sum();
        Self::from_subtotal(subtotal, discount)
    }

    /// Computes the breakdown from an already-summed subtotal.
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal, discount: Discount) -> Self {
        let discount_amount = match discount {
            Discount::Percent(percent) => {
                round_amount(subtotal * percent / Decimal::ONE_HUNDRED)
            }
            Discount::Override(amount) => amount,
        };

        Self {
            subtotal,
            discount_amount,
            total: subtotal - discount_amount,
        }
    }
}

/// Resolves the stored discount mode against a pricing edit.
///
/// The stored percentage is `None` while a manual override is in force.
/// A new percentage discards the override; a new amount alone becomes
/// the override; an edit touching neither keeps the stored mode, so an
/// override survives unrelated edits (last write wins).
#[must_use]
pub fn resolve_discount(
    stored_percent: Option<Decimal>,
    stored_amount: Decimal,
    new_percent: Option<Decimal>,
    new_amount: Option<Decimal>,
) -> (Option<Decimal>, Discount) {
    match (new_percent, new_amount) {
        (Some(percent), _) => (Some(percent), Discount::Percent(percent)),
        (None, Some(amount)) => (None, Discount::Override(amount)),
        (None, None) => match stored_percent {
            Some(percent) => (Some(percent), Discount::Percent(percent)),
            None => (None, Discount::Override(stored_amount)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn line(quantity: i32, unit_price: Decimal) -> PricedLine {
        PricedLine {
            quantity,
            unit_price,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line(3, dec!(1500)).line_total(), dec!(4500));
        assert_eq!(line(0, dec!(1500)).line_total(), dec!(0));
    }

    #[test]
    fn test_percent_discount() {
        let lines = vec![line(1, dec!(50000))];
        let breakdown = PriceBreakdown::compute(&lines, Discount::Percent(dec!(10)));
        assert_eq!(breakdown.subtotal, dec!(50000));
        assert_eq!(breakdown.discount_amount, dec!(5000));
        assert_eq!(breakdown.total, dec!(45000));
    }

    #[test]
    fn test_percent_discount_rounds_half_up() {
        // 12345 * 7.5% = 925.875 -> 926
        let breakdown =
            PriceBreakdown::from_subtotal(dec!(12345), Discount::Percent(dec!(7.5)));
        assert_eq!(breakdown.discount_amount, dec!(926));
        assert_eq!(breakdown.total, dec!(11419));
    }

    #[test]
    fn test_manual_override_wins() {
        let lines = vec![line(1, dec!(50000))];
        let breakdown = PriceBreakdown::compute(&lines, Discount::Override(dec!(7000)));
        assert_eq!(breakdown.discount_amount, dec!(7000));
        assert_eq!(breakdown.total, dec!(43000));
    }

    #[test]
    fn test_amount_alone_becomes_override() {
        let (stored, discount) = resolve_discount(Some(dec!(10)), dec!(5000), None, Some(dec!(7000)));
        assert_eq!(stored, None);
        assert_eq!(discount, Discount::Override(dec!(7000)));
    }

    #[test]
    fn test_new_percent_discards_override() {
        let (stored, discount) = resolve_discount(None, dec!(7000), Some(dec!(12)), None);
        assert_eq!(stored, Some(dec!(12)));
        assert_eq!(discount, Discount::Percent(dec!(12)));
    }

    #[test]
    fn test_override_survives_unrelated_edit() {
        // Editing notes or items only: neither discount field is sent.
        let (stored, discount) = resolve_discount(None, dec!(7000), None, None);
        assert_eq!(stored, None);
        assert_eq!(discount, Discount::Override(dec!(7000)));
    }

    #[test]
    fn test_percent_mode_persists_without_discount_fields() {
        let (stored, discount) = resolve_discount(Some(dec!(10)), dec!(5000), None, None);
        assert_eq!(stored, Some(dec!(10)));
        assert_eq!(discount, Discount::Percent(dec!(10)));
    }

    #[test]
    fn test_zero_and_negative_lines_permitted() {
        let lines = vec![line(1, dec!(-500)), line(2, dec!(0))];
        let breakdown = PriceBreakdown::compute(&lines, Discount::Percent(dec!(0)));
        assert_eq!(breakdown.subtotal, dec!(-500));
        assert_eq!(breakdown.total, dec!(-500));
    }

    proptest! {
        #[test]
        fn prop_total_equals_subtotal_minus_discount(
            subtotal in 0i64..10_000_000,
            percent in 0u8..=100,
        ) {
            let subtotal = Decimal::from(subtotal);
            let breakdown = PriceBreakdown::from_subtotal(
                subtotal,
                Discount::Percent(Decimal::from(percent)),
            );
            prop_assert_eq!(
                breakdown.total,
                breakdown.subtotal - breakdown.discount_amount
            );
            prop_assert!(breakdown.discount_amount >= Decimal::ZERO);
            prop_assert!(breakdown.discount_amount <= subtotal);
        }

        #[test]
        fn prop_override_is_applied_verbatim(
            subtotal in 0i64..10_000_000,
            override_amount in 0i64..10_000_000,
        ) {
            let breakdown = PriceBreakdown::from_subtotal(
                Decimal::from(subtotal),
                Discount::Override(Decimal::from(override_amount)),
            );
            prop_assert_eq!(breakdown.discount_amount, Decimal::from(override_amount));
            prop_assert_eq!(
                breakdown.total,
                Decimal::from(subtotal) - Decimal::from(override_amount)
            );
        }
    }
}
