//! `SeaORM` entity definitions.

pub mod prelude;

pub mod customers;
pub mod invoices;
pub mod sea_orm_active_enums;
pub mod status_changes;
