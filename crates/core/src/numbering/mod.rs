//! Document number formatting.
//!
//! Quotations, orders, and payments share one scheme:
//! `<PREFIX>_<STUDIO>_<YY>_<SEQ4>`, e.g. `QT_AKP_26_0001`. The sequence
//! itself is allocated by the database layer from a per-kind, per-year
//! counter; this module owns the pure format and parse halves.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// The kind of document a number identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// A quotation (`QT_`).
    Quotation,
    /// An order (`ORD_`).
    Order,
    /// A payment receipt (`PAY_`).
    Payment,
}

impl DocumentKind {
    /// Returns the number prefix for this kind.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Quotation => "QT",
            Self::Order => "ORD",
            Self::Payment => "PAY",
        }
    }

    /// Returns the string representation used in the counters table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quotation => "quotation",
            Self::Order => "order",
            Self::Payment => "payment",
        }
    }
}

/// Returns the two-digit year component for a date.
#[must_use]
pub fn two_digit_year(date: NaiveDate) -> i32 {
    date.year() % 100
}

/// Formats a document number from its parts.
///
/// The sequence is left-padded to four digits; sequences beyond 9999 simply
/// widen rather than wrap.
#[must_use]
pub fn format_number(kind: DocumentKind, studio_code: &str, year: i32, sequence: i64) -> String {
    format!("{}_{}_{:02}_{:04}", kind.prefix(), studio_code, year, sequence)
}

/// Parses the trailing sequence out of a document number.
///
/// Returns `None` when the number does not end in an `_`-separated integer.
#[must_use]
pub fn parse_sequence(number: &str) -> Option<i64> {
    number.rsplit('_').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DocumentKind::Quotation, 26, 1, "QT_AKP_26_0001")]
    #[case(DocumentKind::Order, 26, 42, "ORD_AKP_26_0042")]
    #[case(DocumentKind::Payment, 27, 9999, "PAY_AKP_27_9999")]
    #[case(DocumentKind::Order, 27, 10000, "ORD_AKP_27_10000")]
    fn test_format_number(
        #[case] kind: DocumentKind,
        #[case] year: i32,
        #[case] seq: i64,
        #[case] expected: &str,
    ) {
        assert_eq!(format_number(kind, "AKP", year, seq), expected);
    }

    #[rstest]
    #[case("QT_AKP_26_0001", Some(1))]
    #[case("ORD_AKP_26_0042", Some(42))]
    #[case("PAY_AKP_27_10000", Some(10000))]
    #[case("garbage", None)]
    #[case("", None)]
    fn test_parse_sequence(#[case] number: &str, #[case] expected: Option<i64>) {
        assert_eq!(parse_sequence(number), expected);
    }

    #[test]
    fn test_two_digit_year() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        assert_eq!(two_digit_year(date), 26);
    }

    #[test]
    fn test_round_trip() {
        let number = format_number(DocumentKind::Payment, "AKP", 26, 123);
        assert_eq!(parse_sequence(&number), Some(123));
    }
}
