//! Purchase order lifecycle tests
//!
//! Covers the one-way status machine and the document-generation side
//! effect.

use proptest::prelude::*;

use shared::models::OrderStatus;

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Document generation semantics: advance pending to sent, leave
    /// everything else untouched
    fn status_after_document(status: OrderStatus) -> OrderStatus {
        if status == OrderStatus::Pending {
            OrderStatus::Sent
        } else {
            status
        }
    }

    #[test]
    fn test_document_advances_pending_to_sent() {
        assert_eq!(
            status_after_document(OrderStatus::Pending),
            OrderStatus::Sent
        );
    }

    #[test]
    fn test_regeneration_does_not_revert() {
        let sent = status_after_document(OrderStatus::Pending);
        assert_eq!(status_after_document(sent), OrderStatus::Sent);
    }

    #[test]
    fn test_document_leaves_received_alone() {
        assert_eq!(
            status_after_document(OrderStatus::Received),
            OrderStatus::Received
        );
    }

    #[test]
    fn test_manual_transitions_forward_only() {
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Sent));
        assert!(OrderStatus::Sent.can_transition(OrderStatus::Received));

        assert!(!OrderStatus::Sent.can_transition(OrderStatus::Pending));
        assert!(!OrderStatus::Received.can_transition(OrderStatus::Pending));
        assert!(!OrderStatus::Received.can_transition(OrderStatus::Sent));
        assert!(!OrderStatus::Pending.can_transition(OrderStatus::Received));
    }

    #[test]
    fn test_status_serialization_round_trip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Sent,
            OrderStatus::Received,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert_eq!(OrderStatus::parse("cancelled"), None);
        assert_eq!(OrderStatus::parse(""), None);
        assert_eq!(OrderStatus::parse("Pending"), None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn status_strategy() -> impl Strategy<Value = OrderStatus> {
        prop_oneof![
            Just(OrderStatus::Pending),
            Just(OrderStatus::Sent),
            Just(OrderStatus::Received),
        ]
    }

    proptest! {
        /// No transition sequence ever moves a status backward:
        /// pending < sent < received
        #[test]
        fn prop_transitions_monotonic(
            start in status_strategy(),
            attempts in prop::collection::vec(status_strategy(), 1..10)
        ) {
            fn rank(status: OrderStatus) -> u8 {
                match status {
                    OrderStatus::Pending => 0,
                    OrderStatus::Sent => 1,
                    OrderStatus::Received => 2,
                }
            }

            let mut current = start;
            for target in attempts {
                if current.can_transition(target) {
                    prop_assert!(rank(target) > rank(current));
                    current = target;
                }
            }
            prop_assert!(rank(current) >= rank(start));
        }

        /// A status never transitions to itself
        #[test]
        fn prop_no_self_transition(status in status_strategy()) {
            prop_assert!(!status.can_transition(status));
        }
    }
}
