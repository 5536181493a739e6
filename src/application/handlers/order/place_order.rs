//! PlaceOrderHandler - the order placement orchestrator.
//!
//! Sequences cart fetch → order persist → payment → status transition →
//! event publish → cart clear as a forward-only saga. Once the Pending
//! order has committed, nothing is rolled back: a failed payment becomes a
//! PaymentFailed transition, and failures in the non-critical tail (event
//! publish, cart clear) are logged and swallowed.

use std::sync::Arc;

use crate::domain::foundation::{OrderId, Timestamp, UserId};
use crate::domain::order::{Order, OrderError, OrderEvent, PaymentRecord};
use crate::ports::{CartStore, EventPublisher, OrderRepository, PaymentGateway, PaymentOutcome};

/// Command to place an order from the caller's cart.
///
/// The user id comes from the authentication collaborator, passed in
/// explicitly - the orchestrator never reads ambient request state.
#[derive(Debug, Clone)]
pub struct PlaceOrderCommand {
    pub user_id: UserId,
}

/// Caller-visible outcome of a placement.
///
/// A failed payment is a distinct, successful-in-the-saga-sense outcome:
/// the order exists, records the failure, and the caller gets its id for a
/// retry. Only precondition and infrastructure problems surface as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceOrderOutcome {
    /// Payment captured; the cart has been cleared (best-effort).
    Paid(Order),

    /// Payment rejected or unavailable; the cart is untouched.
    PaymentFailed(Order),
}

impl PlaceOrderOutcome {
    /// The order regardless of payment outcome.
    pub fn order(&self) -> &Order {
        match self {
            PlaceOrderOutcome::Paid(order) | PlaceOrderOutcome::PaymentFailed(order) => order,
        }
    }
}

/// Handler for the placement flow.
pub struct PlaceOrderHandler {
    cart_store: Arc<dyn CartStore>,
    repository: Arc<dyn OrderRepository>,
    payment_gateway: Arc<dyn PaymentGateway>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl PlaceOrderHandler {
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
        cmd: PlaceOrderCommand,
    ) -> Result<PlaceOrderOutcome, OrderError> {
        let user_id = cmd.user_id;

        // 1. Fetch the cart snapshot. Absent or empty: reject before any write.
        let cart = match self.cart_store.fetch_cart(&user_id).await? {
            Some(cart) if !cart.is_empty() => cart,
            _ => return Err(OrderError::empty_cart(user_id)),
        };

        // 2-3. Price from the snapshot and persist the Pending order. This
        // write must land before any payment attempt so the attempt is
        // auditable even if payment fails.
        let mut order = Order::from_cart(OrderId::new(), &cart, Timestamp::now())?;
        self.repository.create(&order).await?;
        let total = order.pricing.total;

        tracing::info!(
            order_id = %order.id,
            order_number = %order.order_number,
            user_id = %user_id,
            total,
            "order created, initiating payment"
        );

        // 4. Invoke the payment gateway. Network errors and timeouts are
        // normalized to a failed outcome: fail closed on ambiguity.
        let outcome = match self.payment_gateway.create_payment(&order.id, total).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(
                    order_id = %order.id,
                    error = %err,
                    "payment attempt did not complete, treating as failed"
                );
                PaymentOutcome::failed()
            }
        };

        // 5. Branch on the payment result with version-guarded transitions.
        if !outcome.is_paid() {
            let expected = order.version;
            order.mark_payment_failed(Timestamp::now())?;
            self.repository.update_conditional(&order, expected).await?;

            self.publish(OrderEvent::PaymentFailed {
                order_id: order.id,
                user_id: user_id.clone(),
                amount: total,
                occurred_at: Timestamp::now(),
            })
            .await;

            // The cart stays intact so the user can retry.
            return Ok(PlaceOrderOutcome::PaymentFailed(order));
        }

        let expected = order.version;
        let payment = PaymentRecord {
            method: outcome.method,
            transaction_id: outcome.transaction_id,
            paid_at: Timestamp::now(),
            amount: total,
        };
        order.mark_paid(payment, Timestamp::now())?;
        self.repository.update_conditional(&order, expected).await?;

        self.publish(OrderEvent::Created {
            order_id: order.id,
            order_number: order.order_number.clone(),
            user_id: user_id.clone(),
            total,
            occurred_at: Timestamp::now(),
        })
        .await;

        // 6. Clear the cart, best-effort. A failure here never rolls back
        // the paid order; the stale cart is reclaimed by its own TTL.
        if let Err(err) = self.cart_store.clear_cart(&user_id).await {
            tracing::warn!(
                order_id = %order.id,
                user_id = %user_id,
                error = %err,
                "cart clear failed after paid order; cart TTL will reclaim it"
            );
        }

        Ok(PlaceOrderOutcome::Paid(order))
    }

    /// Publishes fire-and-forget: a publish failure is logged, never surfaced.
    async fn publish(&self, event: OrderEvent) {
        let event_type = event.event_type();
        if let Err(err) = self.event_publisher.publish(event.to_envelope()).await {
            tracing::warn!(event_type, error = %err, "event publish failed");
        }
    }
}
