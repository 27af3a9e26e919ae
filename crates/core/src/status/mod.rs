//! Invoice status changes and the status-change ledger.
//!
//! # Modules
//!
//! - `types` - Change requests, planned transitions, ledger records
//! - `error` - Status-specific error types
//! - `service` - Transition rules for changes and restores
//! - `view` - Change-log presentation

pub mod error;
pub mod service;
pub mod types;
pub mod view;

#[cfg(test)]
mod service_props;

pub use error::StatusError;
pub use service::StatusService;
pub use types::{ChangeKind, LedgerRecord, StatusChangeRequest, StatusTransition};
pub use view::{ChangeLogEntry, ChangeLogRow, ChangeLogView, RestoreAction};
