//! Order domain events.
//!
//! Events are named in past tense for something that has already happened.
//! They feed notification and analytics consumers; the orchestrator treats
//! their delivery as best-effort and never lets a publish failure alter the
//! caller-visible outcome.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::foundation::{EventEnvelope, OrderId, Timestamp, UserId};

use super::{OrderNumber, OrderStatus};

/// Events emitted along the order lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
    /// Order placed and paid through the placement flow.
    Created {
        order_id: OrderId,
        order_number: OrderNumber,
        user_id: UserId,
        total: i64,
        occurred_at: Timestamp,
    },

    /// A previously failed order was paid through the retry flow.
    Paid {
        order_id: OrderId,
        user_id: UserId,
        transaction_id: Option<String>,
        amount: i64,
        occurred_at: Timestamp,
    },

    /// A payment attempt was rejected or unavailable.
    PaymentFailed {
        order_id: OrderId,
        user_id: UserId,
        amount: i64,
        occurred_at: Timestamp,
    },

    /// Administrative status transition (shipped, delivered, ...).
    StatusChanged {
        order_id: OrderId,
        user_id: UserId,
        from: OrderStatus,
        to: OrderStatus,
        occurred_at: Timestamp,
    },

    /// Order was cancelled; `refunded` marks the post-shipping route.
    Cancelled {
        order_id: OrderId,
        user_id: UserId,
        refunded: bool,
        occurred_at: Timestamp,
    },
}

impl OrderEvent {
    /// Event type string used for routing.
    pub fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::Created { .. } => "order.created",
            OrderEvent::Paid { .. } => "order.paid",
            OrderEvent::PaymentFailed { .. } => "order.payment_failed",
            OrderEvent::StatusChanged { .. } => "order.status_changed",
            OrderEvent::Cancelled { .. } => "order.cancelled",
        }
    }

    /// The order this event belongs to.
    pub fn order_id(&self) -> &OrderId {
        match self {
            OrderEvent::Created { order_id, .. }
            | OrderEvent::Paid { order_id, .. }
            | OrderEvent::PaymentFailed { order_id, .. }
            | OrderEvent::StatusChanged { order_id, .. }
            | OrderEvent::Cancelled { order_id, .. } => order_id,
        }
    }

    /// When the event occurred.
    pub fn occurred_at(&self) -> Timestamp {
        match self {
            OrderEvent::Created { occurred_at, .. }
            | OrderEvent::Paid { occurred_at, .. }
            | OrderEvent::PaymentFailed { occurred_at, .. }
            | OrderEvent::StatusChanged { occurred_at, .. }
            | OrderEvent::Cancelled { occurred_at, .. } => *occurred_at,
        }
    }

    /// Wraps the event in a transport envelope for publishing.
    pub fn to_envelope(&self) -> EventEnvelope {
        let payload = serde_json::to_value(self).unwrap_or_else(|_| json!(null));
        EventEnvelope::new(
            self.event_type(),
            self.order_id().to_string(),
            "Order",
            self.occurred_at(),
            payload,
        )
    }
}
