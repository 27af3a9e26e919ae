//! Status change domain types.

use invoicer_shared::types::InvoiceId;
use serde::Serialize;

use crate::invoice::InvoiceStatus;
use crate::status::error::StatusError;

/// How a status mutation was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Direct status change, cancel, or the status part of an edit.
    Change,
    /// Re-application of a previously logged status.
    Restore,
}

/// A validated request to set an invoice's status.
///
/// Construction checks the actor first and the status second, so an
/// anonymous request with a bad status reports `Unauthenticated`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChangeRequest {
    /// Target invoice.
    pub invoice_id: InvoiceId,
    /// Status to apply.
    pub target: InvoiceStatus,
    /// Actor name, trimmed and non-empty.
    pub actor: String,
    /// Change or restore.
    pub kind: ChangeKind,
}

impl StatusChangeRequest {
    /// Builds a direct status change request.
    ///
    /// # Errors
    ///
    /// Returns `StatusError::Unauthenticated` if the actor is absent or blank,
    /// then `StatusError::InvalidStatus` if `status` is not in the set.
    pub fn change(
        invoice_id: InvoiceId,
        status: &str,
        actor: Option<&str>,
    ) -> Result<Self, StatusError> {
        Self::build(invoice_id, status, actor, ChangeKind::Change)
    }

    /// Builds a restore request.
    ///
    /// # Errors
    ///
    /// Same as [`StatusChangeRequest::change`].
    pub fn restore(
        invoice_id: InvoiceId,
        status: &str,
        actor: Option<&str>,
    ) -> Result<Self, StatusError> {
        Self::build(invoice_id, status, actor, ChangeKind::Restore)
    }

    /// Returns the trimmed actor name.
    ///
    /// # Errors
    ///
    /// Returns `StatusError::Unauthenticated` if the actor is absent or blank.
    pub fn require_actor(actor: Option<&str>) -> Result<&str, StatusError> {
        actor
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or(StatusError::Unauthenticated)
    }

    fn build(
        invoice_id: InvoiceId,
        status: &str,
        actor: Option<&str>,
        kind: ChangeKind,
    ) -> Result<Self, StatusError> {
        let actor = Self::require_actor(actor)?;
        let target = InvoiceStatus::parse(status)
            .ok_or_else(|| StatusError::InvalidStatus(status.to_string()))?;

        Ok(Self {
            invoice_id,
            target,
            actor: actor.to_string(),
            kind,
        })
    }
}

/// Ledger row to append alongside a status update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerRecord {
    /// Invoice the change applies to.
    pub invoice_id: InvoiceId,
    /// Status the update overwrote.
    pub previous_status: InvoiceStatus,
    /// Status the update wrote.
    pub new_status: InvoiceStatus,
    /// Actor name.
    pub changed_by: String,
    /// True when appended by a restore.
    pub restored: bool,
}

/// Outcome of planning a status mutation against the current status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    /// Status read under lock before the update.
    pub previous: InvoiceStatus,
    /// Status to write.
    pub target: InvoiceStatus,
    /// Entry to append, if any.
    pub ledger: Option<LedgerRecord>,
}

impl StatusTransition {
    /// Returns true if the stored status value changes.
    #[must_use]
    pub fn changes_status(&self) -> bool {
        self.previous != self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_change_request_valid() {
        let id = InvoiceId::new();
        let request = StatusChangeRequest::change(id, "paid", Some(" alice ")).unwrap();
        assert_eq!(request.invoice_id, id);
        assert_eq!(request.target, InvoiceStatus::Paid);
        assert_eq!(request.actor, "alice");
        assert_eq!(request.kind, ChangeKind::Change);
    }

    #[test]
    fn test_restore_request_kind() {
        let request =
            StatusChangeRequest::restore(InvoiceId::new(), "overdue", Some("bob")).unwrap();
        assert_eq!(request.kind, ChangeKind::Restore);
        assert_eq!(request.target, InvoiceStatus::Overdue);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn test_missing_actor_rejected(#[case] actor: Option<&str>) {
        let result = StatusChangeRequest::change(InvoiceId::new(), "paid", actor);
        assert!(matches!(result, Err(StatusError::Unauthenticated)));
    }

    #[test]
    fn test_invalid_status_rejected() {
        let result = StatusChangeRequest::change(InvoiceId::new(), "archived", Some("alice"));
        match result {
            Err(StatusError::InvalidStatus(raw)) => assert_eq!(raw, "archived"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_require_actor() {
        assert_eq!(StatusChangeRequest::require_actor(Some(" bob")).unwrap(), "bob");
        assert!(StatusChangeRequest::require_actor(Some("")).is_err());
    }

    #[test]
    fn test_actor_checked_before_status() {
        let result = StatusChangeRequest::restore(InvoiceId::new(), "archived", None);
        assert!(matches!(result, Err(StatusError::Unauthenticated)));
    }

    #[test]
    fn test_transition_changes_status() {
        let transition = StatusTransition {
            previous: InvoiceStatus::Paid,
            target: InvoiceStatus::Paid,
            ledger: None,
        };
        assert!(!transition.changes_status());
    }
}
