//! Invoice domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Invoice status.
///
/// Every persisted invoice holds one of these values. Any status may be
/// set from any other through a status change or a restore; there is no
/// transition graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Issued and awaiting payment.
    Pending,
    /// Payment received.
    Paid,
    /// Withdrawn; no payment expected.
    Canceled,
    /// Past due without payment.
    Overdue,
}

impl InvoiceStatus {
    /// All statuses accepted by status mutations.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Paid, Self::Canceled, Self::Overdue];

    /// Statuses accepted by the create and edit forms.
    pub const FORM: [Self; 2] = [Self::Pending, Self::Paid];

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Canceled => "canceled",
            Self::Overdue => "overdue",
        }
    }

    /// Parses a status from its exact stored representation.
    ///
    /// Matching is case-sensitive: `"Paid"` is not a member of the set.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "paid" => Some(Self::Paid),
            "canceled" => Some(Self::Canceled),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }

    /// Returns the capitalized label shown on status badges.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Canceled => "Canceled",
            Self::Overdue => "Overdue",
        }
    }

    /// Returns true if the status may be chosen on the invoice form.
    #[must_use]
    pub const fn is_form_status(&self) -> bool {
        matches!(self, Self::Pending | Self::Paid)
    }

    /// Returns the statuses offered by the status dropdown for an invoice
    /// currently in `self`, i.e. every form status plus `canceled`, minus
    /// the current one.
    #[must_use]
    pub fn dropdown_choices(&self) -> Vec<Self> {
        [Self::Pending, Self::Paid, Self::Canceled]
            .into_iter()
            .filter(|s| s != self)
            .collect()
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
