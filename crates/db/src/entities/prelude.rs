//! Entity re-exports.

pub use super::customers::Entity as Customers;
pub use super::invoices::Entity as Invoices;
pub use super::status_changes::Entity as StatusChanges;
