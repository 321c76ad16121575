//! Decimal money helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal` in whole rupees.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds an amount to whole rupees, halves away from zero.
///
/// This matches how the original system rounded the percentage discount
/// (`Math.round`-style for positive amounts).
#[must_use]
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount with Indian digit grouping (e.g., `1,23,456`).
///
/// Used on printable documents and in notification messages.
#[must_use]
pub fn format_inr(amount: Decimal) -> String {
    let rounded = round_amount(amount);
    let raw = rounded.abs().to_string();
    let digits = raw.split('.').next().unwrap_or(&raw);

    let mut grouped = String::new();
    let len = digits.len();
    for (i, ch) in digits.chars().enumerate() {
        let remaining = len - i;
        if i > 0 && remaining >= 3 && (remaining - 3) % 2 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(4999.5), dec!(5000))]
    #[case(dec!(4999.4), dec!(4999))]
    #[case(dec!(0), dec!(0))]
    #[case(dec!(-12.5), dec!(-13))]
    fn test_round_amount(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_amount(input), expected);
    }

    #[rstest]
    #[case(dec!(0), "0")]
    #[case(dec!(999), "999")]
    #[case(dec!(1000), "1,000")]
    #[case(dec!(45000), "45,000")]
    #[case(dec!(123456), "1,23,456")]
    #[case(dec!(12345678), "1,23,45,678")]
    #[case(dec!(-45000), "-45,000")]
    fn test_format_inr(#[case] input: Decimal, #[case] expected: &str) {
        assert_eq!(format_inr(input), expected);
    }
}
