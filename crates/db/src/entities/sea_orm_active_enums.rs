//! Postgres enum types mapped to Rust.
//!
//! The string values match the `as_str` representations of the core enums,
//! so conversion between the two layers is a straight string-free match.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use aperture_core::order::PaymentStatus as CorePaymentStatus;
use aperture_core::quotation::{
    ItemCategory as CoreItemCategory, QuotationStatus as CoreQuotationStatus,
};

/// Quotation lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "quotation_status")]
#[serde(rename_all = "lowercase")]
pub enum QuotationStatus {
    /// Being drafted.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Sent to the customer.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Accepted; an order exists.
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    /// Turned down.
    #[sea_orm(string_value = "declined")]
    Declined,
}

impl From<CoreQuotationStatus> for QuotationStatus {
    fn from(status: CoreQuotationStatus) -> Self {
        match status {
            CoreQuotationStatus::Draft => Self::Draft,
            CoreQuotationStatus::Pending => Self::Pending,
            CoreQuotationStatus::Confirmed => Self::Confirmed,
            CoreQuotationStatus::Declined => Self::Declined,
        }
    }
}

impl From<QuotationStatus> for CoreQuotationStatus {
    fn from(status: QuotationStatus) -> Self {
        match status {
            QuotationStatus::Draft => Self::Draft,
            QuotationStatus::Pending => Self::Pending,
            QuotationStatus::Confirmed => Self::Confirmed,
            QuotationStatus::Declined => Self::Declined,
        }
    }
}

/// Order payment status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing received yet.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Partially paid.
    #[sea_orm(string_value = "partial")]
    Partial,
    /// Balance cleared.
    #[sea_orm(string_value = "paid")]
    Paid,
}

impl From<CorePaymentStatus> for PaymentStatus {
    fn from(status: CorePaymentStatus) -> Self {
        match status {
            CorePaymentStatus::Pending => Self::Pending,
            CorePaymentStatus::Partial => Self::Partial,
            CorePaymentStatus::Paid => Self::Paid,
        }
    }
}

impl From<PaymentStatus> for CorePaymentStatus {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Pending => Self::Pending,
            PaymentStatus::Partial => Self::Partial,
            PaymentStatus::Paid => Self::Paid,
        }
    }
}

/// How a payment was made.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash in hand.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// UPI transfer.
    #[sea_orm(string_value = "upi")]
    Upi,
    /// Bank transfer (NEFT/IMPS/RTGS).
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    /// Cheque.
    #[sea_orm(string_value = "cheque")]
    Cheque,
    /// Credit or debit card.
    #[sea_orm(string_value = "card")]
    Card,
}

impl PaymentMethod {
    /// Returns the display label used on invoices.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Upi => "UPI",
            Self::BankTransfer => "Bank Transfer",
            Self::Cheque => "Cheque",
            Self::Card => "Card",
        }
    }
}

/// Line item category.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "item_category")]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Photography coverage.
    #[sea_orm(string_value = "photography")]
    Photography,
    /// Videography coverage.
    #[sea_orm(string_value = "videography")]
    Videography,
    /// Add-on services.
    #[sea_orm(string_value = "additional_services")]
    AdditionalServices,
    /// Albums.
    #[sea_orm(string_value = "album")]
    Album,
    /// Prints, frames, gift articles.
    #[sea_orm(string_value = "print_gifts")]
    PrintGifts,
}

impl From<CoreItemCategory> for ItemCategory {
    fn from(category: CoreItemCategory) -> Self {
        match category {
            CoreItemCategory::Photography => Self::Photography,
            CoreItemCategory::Videography => Self::Videography,
            CoreItemCategory::AdditionalServices => Self::AdditionalServices,
            CoreItemCategory::Album => Self::Album,
            CoreItemCategory::PrintGifts => Self::PrintGifts,
        }
    }
}

impl From<ItemCategory> for CoreItemCategory {
    fn from(category: ItemCategory) -> Self {
        match category {
            ItemCategory::Photography => Self::Photography,
            ItemCategory::Videography => Self::Videography,
            ItemCategory::AdditionalServices => Self::AdditionalServices,
            ItemCategory::Album => Self::Album,
            ItemCategory::PrintGifts => Self::PrintGifts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ActiveEnum, Iterable};

    #[test]
    fn test_quotation_status_round_trips_through_core() {
        for status in QuotationStatus::iter() {
            let core: CoreQuotationStatus = status.clone().into();
            assert_eq!(QuotationStatus::from(core), status);
        }
    }

    #[test]
    fn test_item_category_round_trips_through_core() {
        for category in ItemCategory::iter() {
            let core: CoreItemCategory = category.clone().into();
            assert_eq!(ItemCategory::from(core), category);
        }
    }

    #[test]
    fn test_stored_strings_match_core_representation() {
        for category in ItemCategory::iter() {
            let core: CoreItemCategory = category.clone().into();
            assert_eq!(category.to_value(), core.as_str());
        }
    }

    #[test]
    fn test_payment_method_labels() {
        assert_eq!(PaymentMethod::Upi.label(), "UPI");
        assert_eq!(PaymentMethod::BankTransfer.label(), "Bank Transfer");
    }
}
