//! Status transition rules.
//!
//! Any status may follow any other. What varies between a change and a
//! restore is whether a ledger entry is written and how it is flagged.

use crate::invoice::InvoiceStatus;
use crate::status::error::StatusError;
use crate::status::types::{ChangeKind, LedgerRecord, StatusChangeRequest, StatusTransition};

/// Stateless service deciding what a status mutation writes.
pub struct StatusService;

impl StatusService {
    /// Plans a validated request against the status read under lock.
    ///
    /// A change appends an entry only when the status actually differs.
    /// A restore always appends an entry flagged `restored`, recording the
    /// real pre-restore status as the previous status.
    #[must_use]
    pub fn plan(request: &StatusChangeRequest, current: InvoiceStatus) -> StatusTransition {
        let ledger = match request.kind {
            ChangeKind::Change if current == request.target => None,
            ChangeKind::Change => Some(Self::record(request, current, false)),
            ChangeKind::Restore => Some(Self::record(request, current, true)),
        };

        StatusTransition {
            previous: current,
            target: request.target,
            ledger,
        }
    }

    /// Resolves the status a ledger entry's restore action targets.
    ///
    /// # Errors
    ///
    /// Returns `StatusError::InvalidStatus` when the entry has no previous
    /// status or holds a value outside the set.
    pub fn restore_target(previous_status: Option<&str>) -> Result<InvoiceStatus, StatusError> {
        let raw = previous_status.unwrap_or_default();
        InvoiceStatus::parse(raw).ok_or_else(|| StatusError::InvalidStatus(raw.to_string()))
    }

    fn record(
        request: &StatusChangeRequest,
        previous: InvoiceStatus,
        restored: bool,
    ) -> LedgerRecord {
        LedgerRecord {
            invoice_id: request.invoice_id,
            previous_status: previous,
            new_status: request.target,
            changed_by: request.actor.clone(),
            restored,
        }
    }
}
