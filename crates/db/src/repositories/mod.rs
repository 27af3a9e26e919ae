//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod customer;
pub mod invoice;
pub mod status;

pub use customer::{CustomerRepository, CustomerSummary};
pub use invoice::{InvoiceDetail, InvoiceListRow, InvoicePage, InvoiceRepository};
pub use status::{RESTORED_MESSAGE, RestoreResult, StatusRepository};

use invoicer_core::invoice::InvoiceStatus;

use crate::entities::sea_orm_active_enums::InvoiceStatus as DbInvoiceStatus;

/// Converts database InvoiceStatus to core InvoiceStatus.
pub(crate) const fn db_status_to_core(status: DbInvoiceStatus) -> InvoiceStatus {
    match status {
        DbInvoiceStatus::Pending => InvoiceStatus::Pending,
        DbInvoiceStatus::Paid => InvoiceStatus::Paid,
        DbInvoiceStatus::Canceled => InvoiceStatus::Canceled,
        DbInvoiceStatus::Overdue => InvoiceStatus::Overdue,
    }
}

/// Converts core InvoiceStatus to database InvoiceStatus.
pub(crate) const fn core_status_to_db(status: InvoiceStatus) -> DbInvoiceStatus {
    match status {
        InvoiceStatus::Pending => DbInvoiceStatus::Pending,
        InvoiceStatus::Paid => DbInvoiceStatus::Paid,
        InvoiceStatus::Canceled => DbInvoiceStatus::Canceled,
        InvoiceStatus::Overdue => DbInvoiceStatus::Overdue,
    }
}
