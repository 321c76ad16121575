//! Quotation domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quotation status in the sales lifecycle.
///
/// The valid transitions are:
/// - Draft → Pending (mark pending)
/// - Draft | Pending → Confirmed (confirm, spawns an order)
/// - Draft | Pending → Declined (decline)
///
/// Confirmed and Declined are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotationStatus {
    /// Quotation is being drafted and can be modified.
    Draft,
    /// Quotation has been sent to the customer.
    Pending,
    /// Quotation was accepted; an order exists (immutable).
    Confirmed,
    /// Quotation was turned down (immutable).
    Declined,
}

impl QuotationStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Declined => "declined",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "declined" => Some(Self::Declined),
            _ => None,
        }
    }

    /// Returns true if the quotation can still be edited or transitioned.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Draft | Self::Pending)
    }

    /// Returns true if the quotation is in a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Declined)
    }
}

impl fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Line item category on a quotation or order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Photography coverage.
    Photography,
    /// Videography coverage.
    Videography,
    /// Add-on services (drone, LED wall, live stream, ...).
    AdditionalServices,
    /// Albums.
    Album,
    /// Prints, frames, and gift articles.
    PrintGifts,
}

impl ItemCategory {
    /// Returns the storage representation of the category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Photography => "photography",
            Self::Videography => "videography",
            Self::AdditionalServices => "additional_services",
            Self::Album => "album",
            Self::PrintGifts => "print_gifts",
        }
    }

    /// Returns the display label used on documents.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Photography => "Photography",
            Self::Videography => "Videography",
            Self::AdditionalServices => "Additional Services",
            Self::Album => "Album",
            Self::PrintGifts => "Print & Gifts",
        }
    }

    /// Parses a category from its storage representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "photography" => Some(Self::Photography),
            "videography" => Some(Self::Videography),
            "additional_services" => Some(Self::AdditionalServices),
            "album" => Some(Self::Album),
            "print_gifts" => Some(Self::PrintGifts),
            _ => None,
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle action representing a validated state transition.
///
/// Each variant captures the resulting status and the audit data the
/// repository persists alongside it.
#[derive(Debug, Clone)]
pub enum LifecycleAction {
    /// Send a draft quotation to the customer.
    MarkPending {
        /// The new status (Pending).
        new_status: QuotationStatus,
    },
    /// Accept a quotation and spawn an order.
    Confirm {
        /// The new status (Confirmed).
        new_status: QuotationStatus,
        /// When the quotation was confirmed.
        confirmed_at: DateTime<Utc>,
    },
    /// Turn a quotation down.
    Decline {
        /// The new status (Declined).
        new_status: QuotationStatus,
        /// When the quotation was declined.
        declined_at: DateTime<Utc>,
        /// Optional reason given by the customer.
        decline_reason: Option<String>,
    },
}

impl LifecycleAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> QuotationStatus {
        match self {
            Self::MarkPending { new_status }
            | Self::Confirm { new_status, .. }
            | Self::Decline { new_status, .. } => *new_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(QuotationStatus::Draft.as_str(), "draft");
        assert_eq!(QuotationStatus::Pending.as_str(), "pending");
        assert_eq!(QuotationStatus::Confirmed.as_str(), "confirmed");
        assert_eq!(QuotationStatus::Declined.as_str(), "declined");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            QuotationStatus::parse("draft"),
            Some(QuotationStatus::Draft)
        );
        assert_eq!(
            QuotationStatus::parse("CONFIRMED"),
            Some(QuotationStatus::Confirmed)
        );
        assert_eq!(QuotationStatus::parse("bogus"), None);
    }

    #[test]
    fn test_status_openness() {
        assert!(QuotationStatus::Draft.is_open());
        assert!(QuotationStatus::Pending.is_open());
        assert!(!QuotationStatus::Confirmed.is_open());
        assert!(!QuotationStatus::Declined.is_open());
    }

    #[test]
    fn test_status_terminal() {
        assert!(QuotationStatus::Confirmed.is_terminal());
        assert!(QuotationStatus::Declined.is_terminal());
        assert!(!QuotationStatus::Draft.is_terminal());
    }

    #[test]
    fn test_category_round_trip() {
        for category in [
            ItemCategory::Photography,
            ItemCategory::Videography,
            ItemCategory::AdditionalServices,
            ItemCategory::Album,
            ItemCategory::PrintGifts,
        ] {
            assert_eq!(ItemCategory::parse(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(ItemCategory::PrintGifts.label(), "Print & Gifts");
        assert_eq!(
            ItemCategory::AdditionalServices.label(),
            "Additional Services"
        );
    }
}
