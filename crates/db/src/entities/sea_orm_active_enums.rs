//! Enumerated column types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Invoice status as stored in `invoices.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "canceled")]
    Canceled,
    #[sea_orm(string_value = "overdue")]
    Overdue,
}
