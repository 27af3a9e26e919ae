//! Change-log presentation.
//!
//! Turns stored ledger entries into rows a client can render directly,
//! each carrying the restore action it offers.

use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

use crate::invoice::InvoiceStatus;

/// Timestamp format used for change-log rows.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Message shown when an invoice has no ledger entries.
pub const EMPTY_MESSAGE: &str = "No status changes";

/// A stored ledger entry.
///
/// Status columns are kept as raw strings: entries are append-only and
/// are shown as written, even if a value later falls outside the set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeLogEntry {
    /// Sequence number.
    pub id: i32,
    /// Invoice the entry belongs to.
    pub invoice_id: Uuid,
    /// Status before the change.
    pub previous_status: Option<String>,
    /// Status after the change.
    pub new_status: Option<String>,
    /// Actor name.
    pub changed_by: Option<String>,
    /// Write time.
    pub changed_at: NaiveDateTime,
    /// True when appended by a restore.
    pub restored: bool,
}

/// Restore action offered by a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreAction {
    /// Entry whose previous status is restored.
    pub entry_id: i32,
    /// Status the action applies.
    pub target: InvoiceStatus,
    /// Button label.
    pub label: String,
}

/// One presented change-log row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeLogRow {
    /// Entry sequence number.
    pub id: i32,
    /// Actor name.
    pub changed_by: Option<String>,
    /// Status after the change.
    pub new_status: Option<String>,
    /// Status before the change.
    pub previous_status: Option<String>,
    /// Formatted write time.
    pub changed_at: String,
    /// True when appended by a restore.
    pub restored: bool,
    /// Restore action, absent when the previous status cannot be restored.
    pub restore: Option<RestoreAction>,
}

impl From<&ChangeLogEntry> for ChangeLogRow {
    fn from(entry: &ChangeLogEntry) -> Self {
        let restore = entry
            .previous_status
            .as_deref()
            .and_then(InvoiceStatus::parse)
            .map(|target| RestoreAction {
                entry_id: entry.id,
                target,
                label: format!("Restore to {}", target.label()),
            });

        Self {
            id: entry.id,
            changed_by: entry.changed_by.clone(),
            new_status: entry.new_status.clone(),
            previous_status: entry.previous_status.clone(),
            changed_at: entry.changed_at.format(TIMESTAMP_FORMAT).to_string(),
            restored: entry.restored,
            restore,
        }
    }
}

/// Presented change log for one invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeLogView {
    /// Invoice the log belongs to.
    pub invoice_id: Uuid,
    /// Rows, newest first.
    pub entries: Vec<ChangeLogRow>,
    /// True when there are no entries.
    pub empty: bool,
    /// Empty-state message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl ChangeLogView {
    /// Presents entries in the order given, which callers supply newest first.
    #[must_use]
    pub fn present(invoice_id: Uuid, entries: &[ChangeLogEntry]) -> Self {
        let rows: Vec<ChangeLogRow> = entries.iter().map(ChangeLogRow::from).collect();
        let empty = rows.is_empty();

        Self {
            invoice_id,
            entries: rows,
            empty,
            message: empty.then_some(EMPTY_MESSAGE),
        }
    }
}
