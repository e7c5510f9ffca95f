//! Purchase order models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Purchase order lifecycle. `Pending` orders accumulate reorder lines;
/// generating the order document advances them to `Sent`; `Received` is
/// set manually once goods arrive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Sent,
    Received,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Sent => "sent",
            OrderStatus::Received => "received",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(OrderStatus::Pending),
            "sent" => Some(OrderStatus::Sent),
            "received" => Some(OrderStatus::Received),
            _ => None,
        }
    }

    /// Valid manual transitions: pending -> sent -> received. The reverse
    /// direction does not exist; there is no reopen path.
    pub fn can_transition(self, to: OrderStatus) -> bool {
        matches!(
            (self, to),
            (OrderStatus::Pending, OrderStatus::Sent) | (OrderStatus::Sent, OrderStatus::Received)
        )
    }
}

/// A purchase order for one supplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_date: DateTime<Utc>,
    pub supplier_id: Uuid,
    pub status: OrderStatus,
}

/// One line of a purchase order. At most one line exists per
/// (order, item) pair; repeated reorder triggers merge by summing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
}

/// Input for a manual status transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetOrderStatusInput {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_allowed() {
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Sent));
        assert!(OrderStatus::Sent.can_transition(OrderStatus::Received));
    }

    #[test]
    fn backward_and_skip_transitions_rejected() {
        assert!(!OrderStatus::Sent.can_transition(OrderStatus::Pending));
        assert!(!OrderStatus::Received.can_transition(OrderStatus::Sent));
        assert!(!OrderStatus::Received.can_transition(OrderStatus::Pending));
        assert!(!OrderStatus::Pending.can_transition(OrderStatus::Received));
    }

    #[test]
    fn self_transition_rejected() {
        assert!(!OrderStatus::Pending.can_transition(OrderStatus::Pending));
        assert!(!OrderStatus::Sent.can_transition(OrderStatus::Sent));
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [OrderStatus::Pending, OrderStatus::Sent, OrderStatus::Received] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("cancelled"), None);
    }
}
