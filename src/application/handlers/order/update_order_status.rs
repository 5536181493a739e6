//! UpdateOrderStatusHandler - administrative status transition.
//!
//! This is the path the optimistic-concurrency guard exists for: an
//! operator can move an order (ship it, mark delivered, refund it) while a
//! payment flow is in flight, and exactly one of the two writers wins the
//! version check.

use std::sync::Arc;

use crate::domain::foundation::{OrderId, Timestamp};
use crate::domain::order::{Order, OrderError, OrderEvent, OrderStatus};
use crate::ports::{EventPublisher, OrderRepository};

/// Command to transition an order to a new status.
#[derive(Debug, Clone)]
pub struct UpdateOrderStatusCommand {
    pub order_id: OrderId,
    pub target: OrderStatus,
}

/// Handler for administrative status transitions.
pub struct UpdateOrderStatusHandler {
    repository: Arc<dyn OrderRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl UpdateOrderStatusHandler {
    pub fn new(
        repository: Arc<dyn OrderRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: UpdateOrderStatusCommand) -> Result<Order, OrderError> {
        let mut order = self
            .repository
            .find_by_id(&cmd.order_id)
            .await?
            .ok_or(OrderError::NotFound(cmd.order_id))?;

        let from = order.status;
        let expected = order.version;
        order.transition_status(cmd.target, Timestamp::now())?;
        self.repository.update_conditional(&order, expected).await?;

        let event = OrderEvent::StatusChanged {
            order_id: order.id,
            user_id: order.user_id.clone(),
            from,
            to: cmd.target,
            occurred_at: Timestamp::now(),
        };
        if let Err(err) = self.event_publisher.publish(event.to_envelope()).await {
            tracing::warn!(order_id = %order.id, error = %err, "event publish failed");
        }

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::repository::InMemoryOrderRepository;
    use crate::domain::cart::{Cart, CartItem};
    use crate::domain::foundation::{ProductId, UserId};
    use crate::domain::order::PaymentRecord;
    use crate::ports::OrderRepository as _;

    fn paid_order() -> Order {
        let item = CartItem::new(ProductId::new("P1").unwrap(), 1, 500).unwrap();
        let cart = Cart::new(UserId::new("user-1").unwrap(), vec![item]);
        let mut order = Order::from_cart(OrderId::new(), &cart, Timestamp::now()).unwrap();
        order
            .mark_paid(
                PaymentRecord {
                    method: Some("card".into()),
                    transaction_id: Some("txn-1".into()),
                    paid_at: Timestamp::now(),
                    amount: 500,
                },
                Timestamp::now(),
            )
            .unwrap();
        order
    }

    #[tokio::test]
    async fn ships_a_paid_order_and_publishes_status_changed() {
        let repo = Arc::new(InMemoryOrderRepository::new());
        let events = Arc::new(InMemoryEventBus::new());
        let order = paid_order();
        repo.create(&order).await.unwrap();

        let handler = UpdateOrderStatusHandler::new(repo.clone(), events.clone());
        let updated = handler
            .handle(UpdateOrderStatusCommand {
                order_id: order.id,
                target: OrderStatus::Shipped,
            })
            .await
            .unwrap();

        assert_eq!(updated.status, OrderStatus::Shipped);
        assert_eq!(updated.version, order.version + 1);
        assert_eq!(repo.get(&order.id).unwrap().status, OrderStatus::Shipped);
        assert!(events.has_event("order.status_changed"));
    }

    #[tokio::test]
    async fn rejects_transitions_outside_the_table() {
        let repo = Arc::new(InMemoryOrderRepository::new());
        let order = paid_order();
        repo.create(&order).await.unwrap();

        let handler =
            UpdateOrderStatusHandler::new(repo.clone(), Arc::new(InMemoryEventBus::new()));
        let result = handler
            .handle(UpdateOrderStatusCommand {
                order_id: order.id,
                target: OrderStatus::Delivered,
            })
            .await;

        assert!(matches!(result, Err(OrderError::InvalidTransition(_))));
        // Nothing persisted, version untouched.
        assert_eq!(repo.get(&order.id).unwrap().version, order.version);
    }

    #[tokio::test]
    async fn concurrent_stale_writer_receives_conflict() {
        let repo = Arc::new(InMemoryOrderRepository::new());
        let order = paid_order();
        repo.create(&order).await.unwrap();

        let handler = UpdateOrderStatusHandler::new(repo.clone(), Arc::new(InMemoryEventBus::new()));

        // First transition wins.
        handler
            .handle(UpdateOrderStatusCommand {
                order_id: order.id,
                target: OrderStatus::Shipped,
            })
            .await
            .unwrap();

        // A stale writer holding the old snapshot loses the version check.
        let mut stale = order.clone();
        let stale_expected = order.version;
        stale
            .transition_status(OrderStatus::Refunded, Timestamp::now())
            .unwrap();
        let result = repo.update_conditional(&stale, stale_expected).await;

        assert!(result.is_err());
        assert_eq!(repo.get(&order.id).unwrap().status, OrderStatus::Shipped);
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let handler = UpdateOrderStatusHandler::new(
            Arc::new(InMemoryOrderRepository::new()),
            Arc::new(InMemoryEventBus::new()),
        );
        let result = handler
            .handle(UpdateOrderStatusCommand {
                order_id: OrderId::new(),
                target: OrderStatus::Shipped,
            })
            .await;

        assert!(matches!(result, Err(OrderError::NotFound(_))));
    }
}
