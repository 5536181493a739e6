//! Integration tests for the order placement flow.
//!
//! These tests exercise the orchestrator and its surrounding handlers
//! through the public crate API against in-memory adapters, covering the
//! end-to-end saga: cart fetch, order persistence, payment, status
//! transitions, event publication, and cart clearing.

use std::sync::Arc;

use order_service::adapters::cart::InMemoryCartStore;
use order_service::adapters::events::InMemoryEventBus;
use order_service::adapters::payment::MockPaymentGateway;
use order_service::adapters::repository::InMemoryOrderRepository;
use order_service::application::handlers::order::{
    PlaceOrderCommand, PlaceOrderHandler, PlaceOrderOutcome, RetryPaymentCommand,
    RetryPaymentHandler, UpdateOrderStatusCommand, UpdateOrderStatusHandler,
};
use order_service::domain::cart::{Cart, CartItem};
use order_service::domain::foundation::{ProductId, UserId};
use order_service::domain::order::{OrderError, OrderStatus};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    cart_store: Arc<InMemoryCartStore>,
    repository: Arc<InMemoryOrderRepository>,
    gateway: Arc<MockPaymentGateway>,
    events: Arc<InMemoryEventBus>,
}

impl TestApp {
    fn new(cart_store: InMemoryCartStore, gateway: MockPaymentGateway) -> Self {
        Self {
            cart_store: Arc::new(cart_store),
            repository: Arc::new(InMemoryOrderRepository::new()),
            gateway: Arc::new(gateway),
            events: Arc::new(InMemoryEventBus::new()),
        }
    }

    fn place_order(&self) -> PlaceOrderHandler {
        PlaceOrderHandler::new(
            self.cart_store.clone(),
            self.repository.clone(),
            self.gateway.clone(),
            self.events.clone(),
        )
    }

    fn retry_payment(&self) -> RetryPaymentHandler {
        RetryPaymentHandler::new(
            self.cart_store.clone(),
            self.repository.clone(),
            self.gateway.clone(),
            self.events.clone(),
        )
    }

    fn update_status(&self) -> UpdateOrderStatusHandler {
        UpdateOrderStatusHandler::new(self.repository.clone(), self.events.clone())
    }
}

fn user() -> UserId {
    UserId::new("user-1").unwrap()
}

fn cart_item(product: &str, quantity: u32, price: i64) -> CartItem {
    CartItem::new(ProductId::new(product).unwrap(), quantity, price).unwrap()
}

fn p1_cart() -> Cart {
    // The canonical scenario: P1 × 2 at price 10.
    Cart::new(user(), vec![cart_item("P1", 2, 10)])
}

// =============================================================================
// Placement scenarios
// =============================================================================

#[tokio::test]
async fn paid_placement_produces_paid_order_and_empty_cart() {
    let app = TestApp::new(
        InMemoryCartStore::with_cart(p1_cart()),
        MockPaymentGateway::paying(),
    );

    let outcome = app
        .place_order()
        .handle(PlaceOrderCommand { user_id: user() })
        .await
        .unwrap();

    let order = match outcome {
        PlaceOrderOutcome::Paid(order) => order,
        other => panic!("expected Paid, got {:?}", other),
    };

    assert_eq!(order.pricing.total, 20);
    assert_eq!(order.status, OrderStatus::Paid);
    assert!(order.payment.is_some());
    assert!(app.cart_store.cart(&user()).is_none());
    assert!(app.events.has_event("order.created"));
}

#[tokio::test]
async fn failed_placement_keeps_cart_and_exposes_retryable_order() {
    let app = TestApp::new(
        InMemoryCartStore::with_cart(p1_cart()),
        MockPaymentGateway::failing(),
    );

    let outcome = app
        .place_order()
        .handle(PlaceOrderCommand { user_id: user() })
        .await
        .unwrap();

    let order = match outcome {
        PlaceOrderOutcome::PaymentFailed(order) => order,
        other => panic!("expected PaymentFailed, got {:?}", other),
    };

    assert_eq!(order.status, OrderStatus::PaymentFailed);
    assert_eq!(order.version, 2);

    // Cart still contains P1 × 2.
    let cart = app.cart_store.cart(&user()).unwrap();
    assert_eq!(cart.items[0].product_id.as_str(), "P1");
    assert_eq!(cart.items[0].quantity, 2);

    assert!(app.events.has_event("order.payment_failed"));
}

#[tokio::test]
async fn empty_cart_placement_writes_nothing() {
    let app = TestApp::new(InMemoryCartStore::new(), MockPaymentGateway::paying());

    let result = app
        .place_order()
        .handle(PlaceOrderCommand { user_id: user() })
        .await;

    assert!(matches!(result, Err(OrderError::EmptyCart(_))));
    assert_eq!(app.repository.count(), 0);
    assert_eq!(app.gateway.call_count(), 0);
}

// =============================================================================
// Failed placement followed by retry
// =============================================================================

#[tokio::test]
async fn failed_placement_then_successful_retry_converges_to_paid() {
    let cart_store = InMemoryCartStore::with_cart(p1_cart());
    let app = TestApp::new(cart_store, MockPaymentGateway::failing());

    let failed = app
        .place_order()
        .handle(PlaceOrderCommand { user_id: user() })
        .await
        .unwrap();
    let order_id = failed.order().id;

    // Second attempt through a gateway that now approves.
    let retry_app = TestApp {
        cart_store: app.cart_store.clone(),
        repository: app.repository.clone(),
        gateway: Arc::new(MockPaymentGateway::paying()),
        events: app.events.clone(),
    };

    let outcome = retry_app
        .retry_payment()
        .handle(RetryPaymentCommand { order_id })
        .await
        .unwrap();

    let order = match outcome {
        PlaceOrderOutcome::Paid(order) => order,
        other => panic!("expected Paid, got {:?}", other),
    };

    // Same order record, converged forward: no new order was created.
    assert_eq!(order.id, order_id);
    assert_eq!(app.repository.count(), 1);
    assert_eq!(order.status, OrderStatus::Paid);
    assert_eq!(order.version, 4);

    // The cart is cleared once the retry lands on Paid.
    assert!(app.cart_store.cart(&user()).is_none());
    assert!(app.events.has_event("order.paid"));
}

// =============================================================================
// Administrative transitions and the version guard
// =============================================================================

#[tokio::test]
async fn admin_lifecycle_runs_paid_shipped_delivered() {
    let app = TestApp::new(
        InMemoryCartStore::with_cart(p1_cart()),
        MockPaymentGateway::paying(),
    );

    let placed = app
        .place_order()
        .handle(PlaceOrderCommand { user_id: user() })
        .await
        .unwrap();
    let order_id = placed.order().id;

    let shipped = app
        .update_status()
        .handle(UpdateOrderStatusCommand {
            order_id,
            target: OrderStatus::Shipped,
        })
        .await
        .unwrap();
    assert_eq!(shipped.status, OrderStatus::Shipped);

    let delivered = app
        .update_status()
        .handle(UpdateOrderStatusCommand {
            order_id,
            target: OrderStatus::Delivered,
        })
        .await
        .unwrap();

    assert_eq!(delivered.status, OrderStatus::Delivered);
    // Each persisted transition incremented the version by exactly one.
    assert_eq!(delivered.version, placed.order().version + 2);
    assert_eq!(app.events.events_of_type("order.status_changed").len(), 2);
}

#[tokio::test]
async fn stale_concurrent_update_receives_conflict_and_does_not_overwrite() {
    use order_service::domain::foundation::Timestamp;
    use order_service::ports::{OrderRepository, OrderRepositoryError};

    let app = TestApp::new(
        InMemoryCartStore::with_cart(p1_cart()),
        MockPaymentGateway::paying(),
    );

    let placed = app
        .place_order()
        .handle(PlaceOrderCommand { user_id: user() })
        .await
        .unwrap();
    let snapshot = placed.order().clone();

    // Writer A: ship through the handler (wins).
    app.update_status()
        .handle(UpdateOrderStatusCommand {
            order_id: snapshot.id,
            target: OrderStatus::Shipped,
        })
        .await
        .unwrap();

    // Writer B: cancel from the stale snapshot (loses).
    let mut stale = snapshot.clone();
    stale
        .transition_status(OrderStatus::Cancelled, Timestamp::now())
        .unwrap();
    let result = app
        .repository
        .update_conditional(&stale, snapshot.version)
        .await;

    assert!(matches!(result, Err(OrderRepositoryError::Conflict { .. })));
    assert_eq!(
        app.repository.get(&snapshot.id).unwrap().status,
        OrderStatus::Shipped
    );
}
