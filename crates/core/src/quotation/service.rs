//! Quotation lifecycle service.
//!
//! Stateless state machine for quotations: validates a transition against
//! the current status and returns the [`LifecycleAction`] the repository
//! persists. The repository applies actions inside a database transaction
//! with a status-qualified predicate, so a stale transition updates zero
//! rows instead of regressing a terminal quotation.

use chrono::{Duration, NaiveDate, Utc};

use crate::quotation::error::QuotationError;
use crate::quotation::types::{LifecycleAction, QuotationStatus};

/// Stateless service for quotation lifecycle transitions.
pub struct QuotationService;

impl QuotationService {
    /// Send a draft quotation to the customer.
    ///
    /// Allowed only from Draft; Pending is not re-markable.
    pub fn mark_pending(current: QuotationStatus) -> Result<LifecycleAction, QuotationError> {
        match current {
            QuotationStatus::Draft => Ok(LifecycleAction::MarkPending {
                new_status: QuotationStatus::Pending,
            }),
            _ => Err(QuotationError::InvalidTransition {
                from: current,
                to: QuotationStatus::Pending,
            }),
        }
    }

    /// Accept a quotation, spawning an order.
    ///
    /// Allowed from Draft or Pending; Pending is not a strict gate.
    pub fn confirm(current: QuotationStatus) -> Result<LifecycleAction, QuotationError> {
        if current.is_open() {
            Ok(LifecycleAction::Confirm {
                new_status: QuotationStatus::Confirmed,
                confirmed_at: Utc::now(),
            })
        } else {
            Err(QuotationError::InvalidTransition {
                from: current,
                to: QuotationStatus::Confirmed,
            })
        }
    }

    /// Turn a quotation down, with an optional reason.
    ///
    /// Allowed from Draft or Pending.
    pub fn decline(
        current: QuotationStatus,
        decline_reason: Option<String>,
    ) -> Result<LifecycleAction, QuotationError> {
        if current.is_open() {
            Ok(LifecycleAction::Decline {
                new_status: QuotationStatus::Declined,
                declined_at: Utc::now(),
                decline_reason: decline_reason.filter(|r| !r.trim().is_empty()),
            })
        } else {
            Err(QuotationError::InvalidTransition {
                from: current,
                to: QuotationStatus::Declined,
            })
        }
    }

    /// Checks that a quotation may still be edited (items replaced, pricing
    /// changed, metadata updated).
    pub fn ensure_editable(current: QuotationStatus) -> Result<(), QuotationError> {
        if current.is_open() {
            Ok(())
        } else {
            Err(QuotationError::CannotModifyFinal(current))
        }
    }

    /// Checks that a quotation may be deleted.
    ///
    /// Declined and open quotations delete freely (cascading to their line
    /// items only); confirmed quotations are referenced by their order.
    pub fn ensure_deletable(current: QuotationStatus) -> Result<(), QuotationError> {
        match current {
            QuotationStatus::Confirmed => Err(QuotationError::CannotDeleteConfirmed),
            _ => Ok(()),
        }
    }

    /// Computes the validity cutoff for a quotation created on `created_on`.
    #[must_use]
    pub fn valid_until(created_on: NaiveDate, validity_days: i64) -> NaiveDate {
        created_on + Duration::days(validity_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_pending_from_draft() {
        let action = QuotationService::mark_pending(QuotationStatus::Draft).unwrap();
        assert_eq!(action.new_status(), QuotationStatus::Pending);
    }

    #[test]
    fn test_mark_pending_from_pending_rejected() {
        let result = QuotationService::mark_pending(QuotationStatus::Pending);
        assert!(matches!(
            result,
            Err(QuotationError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_confirm_from_draft_and_pending() {
        for status in [QuotationStatus::Draft, QuotationStatus::Pending] {
            let action = QuotationService::confirm(status).unwrap();
            assert_eq!(action.new_status(), QuotationStatus::Confirmed);
        }
    }

    #[test]
    fn test_terminal_states_reject_all_transitions() {
        for status in [QuotationStatus::Confirmed, QuotationStatus::Declined] {
            assert!(QuotationService::mark_pending(status).is_err());
            assert!(QuotationService::confirm(status).is_err());
            assert!(QuotationService::decline(status, None).is_err());
        }
    }

    #[test]
    fn test_decline_keeps_reason() {
        let action =
            QuotationService::decline(QuotationStatus::Pending, Some("budget mismatch".into()))
                .unwrap();
        let LifecycleAction::Decline { decline_reason, .. } = action else {
            panic!("expected decline action");
        };
        assert_eq!(decline_reason.as_deref(), Some("budget mismatch"));
    }

    #[test]
    fn test_decline_blank_reason_becomes_none() {
        let action =
            QuotationService::decline(QuotationStatus::Draft, Some("   ".into())).unwrap();
        let LifecycleAction::Decline { decline_reason, .. } = action else {
            panic!("expected decline action");
        };
        assert!(decline_reason.is_none());
    }

    #[test]
    fn test_editable_and_deletable() {
        assert!(QuotationService::ensure_editable(QuotationStatus::Draft).is_ok());
        assert!(QuotationService::ensure_editable(QuotationStatus::Pending).is_ok());
        assert!(QuotationService::ensure_editable(QuotationStatus::Confirmed).is_err());

        assert!(QuotationService::ensure_deletable(QuotationStatus::Draft).is_ok());
        assert!(QuotationService::ensure_deletable(QuotationStatus::Declined).is_ok());
        assert!(matches!(
            QuotationService::ensure_deletable(QuotationStatus::Confirmed),
            Err(QuotationError::CannotDeleteConfirmed)
        ));
    }

    #[test]
    fn test_valid_until_is_thirty_days_out() {
        let created = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        assert_eq!(
            QuotationService::valid_until(created, 30),
            NaiveDate::from_ymd_opt(2026, 2, 14).unwrap()
        );
    }
}
