//! Property-based tests for StatusService and request validation.

use invoicer_shared::types::InvoiceId;
use proptest::prelude::*;
use uuid::Uuid;

use crate::invoice::InvoiceStatus;
use crate::status::error::StatusError;
use crate::status::service::StatusService;
use crate::status::types::StatusChangeRequest;

/// Strategy for generating random InvoiceStatus values.
fn arb_status() -> impl Strategy<Value = InvoiceStatus> {
    prop_oneof![
        Just(InvoiceStatus::Pending),
        Just(InvoiceStatus::Paid),
        Just(InvoiceStatus::Canceled),
        Just(InvoiceStatus::Overdue),
    ]
}

/// Strategy for generating invoice ids.
fn arb_invoice_id() -> impl Strategy<Value = InvoiceId> {
    any::<u128>().prop_map(|n| InvoiceId::from_uuid(Uuid::from_u128(n)))
}

/// Strategy for generating actor names with at least one visible character.
fn arb_actor() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9 ]{0,30}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A change writes an entry exactly when the status differs.
    #[test]
    fn prop_change_logs_iff_status_differs(
        id in arb_invoice_id(),
        current in arb_status(),
        target in arb_status(),
        actor in arb_actor(),
    ) {
        let request = StatusChangeRequest::change(id, target.as_str(), Some(&actor)).unwrap();
        let transition = StatusService::plan(&request, current);

        prop_assert_eq!(transition.target, target);
        prop_assert_eq!(transition.ledger.is_some(), current != target);
        if let Some(ledger) = transition.ledger {
            prop_assert_eq!(ledger.previous_status, current);
            prop_assert_eq!(ledger.new_status, target);
            prop_assert_eq!(ledger.changed_by, actor.trim());
            prop_assert!(!ledger.restored);
        }
    }

    /// A restore always writes one restored entry with the real previous status.
    #[test]
    fn prop_restore_always_logs(
        id in arb_invoice_id(),
        current in arb_status(),
        target in arb_status(),
        actor in arb_actor(),
    ) {
        let request = StatusChangeRequest::restore(id, target.as_str(), Some(&actor)).unwrap();
        let transition = StatusService::plan(&request, current);

        let ledger = transition.ledger.expect("restore must log");
        prop_assert_eq!(ledger.invoice_id, id);
        prop_assert_eq!(ledger.previous_status, current);
        prop_assert_eq!(ledger.new_status, target);
        prop_assert!(ledger.restored);
    }

    /// Strings outside the set never produce a request.
    #[test]
    fn prop_unknown_status_rejected(
        id in arb_invoice_id(),
        raw in "[a-zA-Z]{0,12}",
    ) {
        prop_assume!(InvoiceStatus::parse(&raw).is_none());
        let result = StatusChangeRequest::change(id, &raw, Some("alice"));
        prop_assert!(matches!(result, Err(StatusError::InvalidStatus(_))));
    }

    /// Whitespace-only actors are treated as absent.
    #[test]
    fn prop_blank_actor_rejected(
        id in arb_invoice_id(),
        target in arb_status(),
        blank in "[ \t]{0,8}",
    ) {
        let result = StatusChangeRequest::change(id, target.as_str(), Some(&blank));
        prop_assert!(matches!(result, Err(StatusError::Unauthenticated)));
    }
}
