//! Invoice records and their form rules.
//!
//! - `types` - The invoice status set
//! - `form` - Create/edit form validation
//! - `error` - CRUD error types

pub mod error;
pub mod form;
pub mod types;

pub use error::InvoiceError;
pub use form::{FormErrors, FormPurpose, InvoiceForm, ValidatedInvoice};
pub use types::InvoiceStatus;
