//! Invoice list filtering and page caching.
//!
//! - `cache` - In-process cache of list pages, cleared on every write

pub mod cache;

use serde::Serialize;

use crate::invoice::InvoiceStatus;

pub use cache::{ListingCache, ListingKey};

/// Status tab applied to the invoice list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// No status filter.
    #[default]
    All,
    /// Only invoices with the given status.
    #[serde(untagged)]
    Only(InvoiceStatus),
}

impl StatusFilter {
    /// Parses a tab value. Empty, `all` and unknown values select every status.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        raw.map(str::trim)
            .and_then(InvoiceStatus::parse)
            .map_or(Self::All, Self::Only)
    }

    /// Returns the status to filter on, if any.
    #[must_use]
    pub const fn status(self) -> Option<InvoiceStatus> {
        match self {
            Self::All => None,
            Self::Only(status) => Some(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, StatusFilter::All)]
    #[case(Some(""), StatusFilter::All)]
    #[case(Some("all"), StatusFilter::All)]
    #[case(Some("archived"), StatusFilter::All)]
    #[case(Some("paid"), StatusFilter::Only(InvoiceStatus::Paid))]
    #[case(Some(" overdue "), StatusFilter::Only(InvoiceStatus::Overdue))]
    fn test_status_filter_parse(#[case] raw: Option<&str>, #[case] expected: StatusFilter) {
        assert_eq!(StatusFilter::parse(raw), expected);
    }

    #[test]
    fn test_status_filter_status() {
        assert_eq!(StatusFilter::All.status(), None);
        assert_eq!(
            StatusFilter::Only(InvoiceStatus::Canceled).status(),
            Some(InvoiceStatus::Canceled)
        );
    }

    #[test]
    fn test_status_filter_serializes_as_tab_name() {
        assert_eq!(serde_json::to_string(&StatusFilter::All).unwrap(), "\"all\"");
        assert_eq!(
            serde_json::to_string(&StatusFilter::Only(InvoiceStatus::Paid)).unwrap(),
            "\"paid\""
        );
    }
}
