//! Status change and restore error types.

use invoicer_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while changing, restoring or logging a status.
///
/// Every variant is returned as a value; none of the status operations
/// panic on bad input.
#[derive(Debug, Error)]
pub enum StatusError {
    /// Invoice does not exist.
    #[error("invoice not found")]
    InvoiceNotFound(Uuid),

    /// Ledger entry does not exist or belongs to another invoice.
    #[error("status change not found")]
    EntryNotFound {
        /// Invoice the entry was looked up under.
        invoice_id: Uuid,
        /// Requested entry.
        entry_id: i32,
    },

    /// Target status is outside the enumerated set.
    #[error("invalid status.")]
    InvalidStatus(String),

    /// No actor name is attached to the request.
    #[error("user not auth.")]
    Unauthenticated,

    /// Store failure.
    #[error("Database Error: {0}")]
    Database(String),
}

impl StatusError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvoiceNotFound(_) | Self::EntryNotFound { .. } => 404,
            Self::InvalidStatus(_) => 400,
            Self::Unauthenticated => 401,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::EntryNotFound { .. } => "STATUS_CHANGE_NOT_FOUND",
            Self::InvalidStatus(_) => "INVALID_STATUS",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<StatusError> for AppError {
    fn from(err: StatusError) -> Self {
        let message = err.to_string();
        match err {
            StatusError::InvoiceNotFound(_) | StatusError::EntryNotFound { .. } => {
                Self::NotFound(message)
            }
            StatusError::InvalidStatus(_) => Self::Validation(message),
            StatusError::Unauthenticated => Self::Unauthorized(message),
            StatusError::Database(msg) => Self::Database(msg),
        }
    }
}
