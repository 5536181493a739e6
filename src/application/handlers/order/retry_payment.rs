//! RetryPaymentHandler - re-drive payment for a failed order.
//!
//! PaymentFailed is not a terminal state: a retry re-enters PaymentPending
//! and converges to Paid or back to PaymentFailed through the same
//! version-guarded transitions as the placement flow. The cart is cleared
//! only when the retry reaches Paid.

use std::sync::Arc;

use crate::domain::foundation::{OrderId, Timestamp};
use crate::domain::order::{OrderError, OrderEvent, PaymentRecord};
use crate::ports::{CartStore, EventPublisher, OrderRepository, PaymentGateway, PaymentOutcome};

use super::PlaceOrderOutcome;

/// Command to retry payment on a PaymentFailed order.
#[derive(Debug, Clone)]
pub struct RetryPaymentCommand {
    pub order_id: OrderId,
}

/// Handler for the payment retry flow.
pub struct RetryPaymentHandler {
    cart_store: Arc<dyn CartStore>,
    repository: Arc<dyn OrderRepository>,
    payment_gateway: Arc<dyn PaymentGateway>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl RetryPaymentHandler {
    pub fn new(
        cart_store: Arc<dyn CartStore>,
        repository: Arc<dyn OrderRepository>,
        payment_gateway: Arc<dyn PaymentGateway>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            cart_store,
            repository,
            payment_gateway,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: RetryPaymentCommand,
    ) -> Result<PlaceOrderOutcome, OrderError> {
        let mut order = self
            .repository
            .find_by_id(&cmd.order_id)
            .await?
            .ok_or(OrderError::NotFound(cmd.order_id))?;

        // Re-enter PaymentPending; rejected unless the order is PaymentFailed.
        let expected = order.version;
        order.begin_payment_retry(Timestamp::now())?;
        self.repository.update_conditional(&order, expected).await?;

        let total = order.pricing.total;
        let outcome = match self.payment_gateway.create_payment(&order.id, total).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(
                    order_id = %order.id,
                    error = %err,
                    "payment retry did not complete, treating as failed"
                );
                PaymentOutcome::failed()
            }
        };

        if !outcome.is_paid() {
            let expected = order.version;
            order.mark_payment_failed(Timestamp::now())?;
            self.repository.update_conditional(&order, expected).await?;

            self.publish(OrderEvent::PaymentFailed {
                order_id: order.id,
                user_id: order.user_id.clone(),
                amount: total,
                occurred_at: Timestamp::now(),
            })
            .await;

            return Ok(PlaceOrderOutcome::PaymentFailed(order));
        }

        let expected = order.version;
        let payment = PaymentRecord {
            method: outcome.method,
            transaction_id: outcome.transaction_id.clone(),
            paid_at: Timestamp::now(),
            amount: total,
        };
        order.mark_paid(payment, Timestamp::now())?;
        self.repository.update_conditional(&order, expected).await?;

        self.publish(OrderEvent::Paid {
            order_id: order.id,
            user_id: order.user_id.clone(),
            transaction_id: outcome.transaction_id,
            amount: total,
            occurred_at: Timestamp::now(),
        })
        .await;

        // Same rule as placement: the cart is cleared only on the paid
        // branch, and only best-effort.
        if let Err(err) = self.cart_store.clear_cart(&order.user_id).await {
            tracing::warn!(
                order_id = %order.id,
                user_id = %order.user_id,
                error = %err,
                "cart clear failed after paid retry; cart TTL will reclaim it"
            );
        }

        Ok(PlaceOrderOutcome::Paid(order))
    }

    async fn publish(&self, event: OrderEvent) {
        let event_type = event.event_type();
        if let Err(err) = self.event_publisher.publish(event.to_envelope()).await {
            tracing::warn!(event_type, error = %err, "event publish failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cart::InMemoryCartStore;
    use crate::adapters::events::InMemoryEventBus;
    use crate::adapters::payment::MockPaymentGateway;
    use crate::adapters::repository::InMemoryOrderRepository;
    use crate::domain::cart::{Cart, CartItem};
    use crate::domain::foundation::{ProductId, UserId};
    use crate::domain::order::{Order, OrderStatus};
    use crate::ports::OrderRepository as _;

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn seeded_cart() -> Cart {
        let item = CartItem::new(ProductId::new("P1").unwrap(), 2, 10).unwrap();
        Cart::new(user(), vec![item])
    }

    fn failed_order() -> Order {
        let mut order = Order::from_cart(OrderId::new(), &seeded_cart(), Timestamp::now()).unwrap();
        order.mark_payment_failed(Timestamp::now()).unwrap();
        order
    }

    fn handler_with(
        cart_store: Arc<InMemoryCartStore>,
        repo: Arc<InMemoryOrderRepository>,
        gateway: Arc<MockPaymentGateway>,
        events: Arc<InMemoryEventBus>,
    ) -> RetryPaymentHandler {
        RetryPaymentHandler::new(cart_store, repo, gateway, events)
    }

    #[tokio::test]
    async fn successful_retry_converges_to_paid_and_clears_cart() {
        let cart_store = Arc::new(InMemoryCartStore::with_cart(seeded_cart()));
        let repo = Arc::new(InMemoryOrderRepository::new());
        let events = Arc::new(InMemoryEventBus::new());
        let order = failed_order();
        repo.create(&order).await.unwrap();

        let handler = handler_with(
            cart_store.clone(),
            repo.clone(),
            Arc::new(MockPaymentGateway::paying()),
            events.clone(),
        );
        let outcome = handler
            .handle(RetryPaymentCommand { order_id: order.id })
            .await
            .unwrap();

        let paid = match outcome {
            PlaceOrderOutcome::Paid(order) => order,
            other => panic!("expected Paid, got {:?}", other),
        };
        assert_eq!(paid.status, OrderStatus::Paid);
        // PaymentFailed(2) → PaymentPending(3) → Paid(4)
        assert_eq!(paid.version, 4);
        assert!(paid.payment.is_some());
        assert!(cart_store.cart(&user()).is_none());
        assert!(events.has_event("order.paid"));
    }

    #[tokio::test]
    async fn failed_retry_returns_to_payment_failed_and_keeps_cart() {
        let cart_store = Arc::new(InMemoryCartStore::with_cart(seeded_cart()));
        let repo = Arc::new(InMemoryOrderRepository::new());
        let events = Arc::new(InMemoryEventBus::new());
        let order = failed_order();
        repo.create(&order).await.unwrap();

        let handler = handler_with(
            cart_store.clone(),
            repo.clone(),
            Arc::new(MockPaymentGateway::failing()),
            events.clone(),
        );
        let outcome = handler
            .handle(RetryPaymentCommand { order_id: order.id })
            .await
            .unwrap();

        assert!(matches!(outcome, PlaceOrderOutcome::PaymentFailed(_)));
        assert_eq!(
            repo.get(&order.id).unwrap().status,
            OrderStatus::PaymentFailed
        );
        assert!(cart_store.cart(&user()).is_some());
        assert!(events.has_event("order.payment_failed"));
    }

    #[tokio::test]
    async fn retry_is_rejected_for_paid_orders() {
        let repo = Arc::new(InMemoryOrderRepository::new());
        let mut order = failed_order();
        order.begin_payment_retry(Timestamp::now()).unwrap();
        order
            .mark_paid(
                PaymentRecord {
                    method: None,
                    transaction_id: Some("txn-1".into()),
                    paid_at: Timestamp::now(),
                    amount: 20,
                },
                Timestamp::now(),
            )
            .unwrap();
        repo.create(&order).await.unwrap();

        let handler = handler_with(
            Arc::new(InMemoryCartStore::new()),
            repo,
            Arc::new(MockPaymentGateway::paying()),
            Arc::new(InMemoryEventBus::new()),
        );
        let result = handler
            .handle(RetryPaymentCommand { order_id: order.id })
            .await;

        assert!(matches!(result, Err(OrderError::InvalidTransition(_))));
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let handler = handler_with(
            Arc::new(InMemoryCartStore::new()),
            Arc::new(InMemoryOrderRepository::new()),
            Arc::new(MockPaymentGateway::paying()),
            Arc::new(InMemoryEventBus::new()),
        );
        let result = handler
            .handle(RetryPaymentCommand {
                order_id: OrderId::new(),
            })
            .await;

        assert!(matches!(result, Err(OrderError::NotFound(_))));
    }
}
