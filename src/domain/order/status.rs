//! Order status state machine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// Lifecycle status of an order.
///
/// Forward-only: a failed step is accounted for by moving to a state that
/// records the failure, never by reverting or deleting committed work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Created from a cart, no payment attempt yet.
    Pending,

    /// A payment attempt is in flight (initial attempt or retry).
    PaymentPending,

    /// Payment captured. The only state that clears the cart.
    Paid,

    /// Payment rejected or unavailable. Not terminal: retry re-enters
    /// PaymentPending.
    PaymentFailed,

    /// Handed to the carrier.
    Shipped,

    /// Received by the customer. Terminal.
    Delivered,

    /// Administratively cancelled before shipping.
    Cancelled,

    /// Money returned. Cancellation of a shipped order lands here.
    Refunded,
}

impl StateMachine for OrderStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use OrderStatus::*;
        matches!(
            (self, target),
            (Pending, PaymentPending)
                | (Pending, Paid)
                | (Pending, PaymentFailed)
                | (Pending, Cancelled)
                | (PaymentPending, Paid)
                | (PaymentPending, PaymentFailed)
                | (PaymentPending, Cancelled)
                | (PaymentFailed, PaymentPending)
                | (PaymentFailed, Cancelled)
                | (Paid, Shipped)
                | (Paid, Cancelled)
                | (Paid, Refunded)
                | (Shipped, Delivered)
                | (Shipped, Refunded)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use OrderStatus::*;
        match self {
            Pending => vec![PaymentPending, Paid, PaymentFailed, Cancelled],
            PaymentPending => vec![Paid, PaymentFailed, Cancelled],
            PaymentFailed => vec![PaymentPending, Cancelled],
            Paid => vec![Shipped, Cancelled, Refunded],
            Shipped => vec![Delivered, Refunded],
            Delivered | Cancelled | Refunded => vec![],
        }
    }
}

impl OrderStatus {
    /// Wire/storage representation, matching the serde rename.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::PaymentPending => "PAYMENT_PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::PaymentFailed => "PAYMENT_FAILED",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Refunded => "REFUNDED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "PAYMENT_PENDING" => Ok(OrderStatus::PaymentPending),
            "PAID" => Ok(OrderStatus::Paid),
            "PAYMENT_FAILED" => Ok(OrderStatus::PaymentFailed),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            "REFUNDED" => Ok(OrderStatus::Refunded),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown order status '{}'", other),
            )),
        }
    }
}
