//! Quotation lifecycle error types.

use thiserror::Error;

use crate::quotation::types::QuotationStatus;

/// Errors that can occur during quotation lifecycle operations.
#[derive(Debug, Error)]
pub enum QuotationError {
    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: QuotationStatus,
        /// The attempted target status.
        to: QuotationStatus,
    },

    /// Attempted to edit a confirmed or declined quotation.
    #[error("Cannot modify a {0} quotation")]
    CannotModifyFinal(QuotationStatus),

    /// Attempted to delete a confirmed quotation.
    ///
    /// A confirmed quotation is referenced by the order it spawned; deleting
    /// it would leave that back-reference dangling.
    #[error("Cannot delete a confirmed quotation; delete the order first")]
    CannotDeleteConfirmed,
}

impl QuotationError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. } => 409,
            Self::CannotModifyFinal(_) | Self::CannotDeleteConfirmed => 422,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::CannotModifyFinal(_) => "CANNOT_MODIFY_FINAL",
            Self::CannotDeleteConfirmed => "CANNOT_DELETE_CONFIRMED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_error() {
        let err = QuotationError::InvalidTransition {
            from: QuotationStatus::Confirmed,
            to: QuotationStatus::Pending,
        };
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert!(err.to_string().contains("confirmed"));
        assert!(err.to_string().contains("pending"));
    }

    #[test]
    fn test_cannot_modify_final_error() {
        let err = QuotationError::CannotModifyFinal(QuotationStatus::Declined);
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.error_code(), "CANNOT_MODIFY_FINAL");
    }

    #[test]
    fn test_cannot_delete_confirmed_error() {
        let err = QuotationError::CannotDeleteConfirmed;
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.error_code(), "CANNOT_DELETE_CONFIRMED");
    }
}
