//! CancelOrderHandler - administrative cancellation.
//!
//! Cancellation is a status transition, not row removal - except for an
//! order that never reached a payment attempt, which may be deleted
//! outright. Once an order has shipped, cancellation routes through a
//! refund instead.

use std::sync::Arc;

use crate::domain::foundation::{OrderId, Timestamp};
use crate::domain::order::{Order, OrderError, OrderEvent, OrderStatus};
use crate::ports::{EventPublisher, OrderRepository};

/// Command to cancel an order.
#[derive(Debug, Clone)]
pub struct CancelOrderCommand {
    pub order_id: OrderId,
}

/// What cancellation did to the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOrderResult {
    /// The order had seen no payment attempt and was removed outright.
    Deleted,

    /// Forward transition to Cancelled (order had not shipped).
    Cancelled(Order),

    /// Forward transition to Refunded (order had shipped).
    Refunded(Order),
}

/// Handler for order cancellation.
pub struct CancelOrderHandler {
    repository: Arc<dyn OrderRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CancelOrderHandler {
    pub fn new(
        repository: Arc<dyn OrderRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: CancelOrderCommand) -> Result<CancelOrderResult, OrderError> {
        let mut order = self
            .repository
            .find_by_id(&cmd.order_id)
            .await?
            .ok_or(OrderError::NotFound(cmd.order_id))?;

        // No payment attempt yet: the record carries no audit value and may
        // be removed instead of transitioned.
        if !order.payment_attempted() {
            self.repository.delete(&order.id).await?;
            self.publish_cancelled(&order, false).await;
            return Ok(CancelOrderResult::Deleted);
        }

        let target = match order.status {
            // A shipped order's cancellation is a refund, not a deletion.
            OrderStatus::Shipped => OrderStatus::Refunded,
            _ => OrderStatus::Cancelled,
        };

        let expected = order.version;
        order.transition_status(target, Timestamp::now())?;
        self.repository.update_conditional(&order, expected).await?;

        let refunded = target == OrderStatus::Refunded;
        self.publish_cancelled(&order, refunded).await;

        Ok(if refunded {
            CancelOrderResult::Refunded(order)
        } else {
            CancelOrderResult::Cancelled(order)
        })
    }

    async fn publish_cancelled(&self, order: &Order, refunded: bool) {
        let event = OrderEvent::Cancelled {
            order_id: order.id,
            user_id: order.user_id.clone(),
            refunded,
            occurred_at: Timestamp::now(),
        };
        if let Err(err) = self.event_publisher.publish(event.to_envelope()).await {
            tracing::warn!(order_id = %order.id, error = %err, "event publish failed");
        }
    }
}
