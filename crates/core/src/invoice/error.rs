//! Invoice CRUD error types.

use invoicer_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::invoice::form::FormErrors;

/// Errors that can occur while creating, reading or editing invoices.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// Invoice does not exist.
    #[error("invoice not found")]
    NotFound(Uuid),

    /// Form input failed validation.
    #[error(transparent)]
    InvalidForm(#[from] FormErrors),

    /// No actor is attached to the request.
    #[error("user not auth.")]
    Unauthenticated,

    /// Database error.
    #[error("Database Error: {0}")]
    Database(String),
}

impl InvoiceError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::InvalidForm(_) => 400,
            Self::Unauthenticated => 401,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "INVOICE_NOT_FOUND",
            Self::InvalidForm(_) => "INVALID_FORM",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<InvoiceError> for AppError {
    fn from(err: InvoiceError) -> Self {
        let message = err.to_string();
        match err {
            InvoiceError::NotFound(_) => Self::NotFound(message),
            InvoiceError::InvalidForm(form) => Self::InvalidForm {
                message: form.message,
                fields: form.fields,
            },
            InvoiceError::Unauthenticated => Self::Unauthorized(message),
            InvoiceError::Database(msg) => Self::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::form::FormPurpose;

    #[test]
    fn test_not_found_error() {
        let err = InvoiceError::NotFound(Uuid::nil());
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "INVOICE_NOT_FOUND");
        assert_eq!(err.to_string(), "invoice not found");
    }

    #[test]
    fn test_invalid_form_error_keeps_fields() {
        let err = InvoiceError::from(FormErrors::unknown_customer(FormPurpose::Create));
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "Missing Fields. Failed to Create Invoice.");

        let app: AppError = err.into();
        match app {
            AppError::InvalidForm { message, fields } => {
                assert_eq!(message, "Missing Fields. Failed to Create Invoice.");
                assert!(fields.contains_key("customerId"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unauthenticated_error() {
        let err = InvoiceError::Unauthenticated;
        assert_eq!(err.status_code(), 401);
        let app: AppError = err.into();
        assert_eq!(app.status_code(), 401);
    }

    #[test]
    fn test_database_error() {
        let err = InvoiceError::Database("connection reset".to_string());
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.to_string(), "Database Error: connection reset");
        assert_eq!(AppError::from(err).error_code(), "DATABASE_ERROR");
    }
}
