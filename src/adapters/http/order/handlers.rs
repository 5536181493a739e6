//! HTTP handlers for order endpoints.
//!
//! These handlers connect axum routes to application layer command/query
//! handlers. The caller's identity always comes from the authentication
//! boundary (extractor), never from the request body.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::order::{
    CancelOrderCommand, CancelOrderHandler, CancelOrderResult, GetOrderHandler, GetOrderQuery,
    ListUserOrdersHandler, ListUserOrdersQuery, PlaceOrderCommand, PlaceOrderHandler,
    PlaceOrderOutcome, RetryPaymentCommand, RetryPaymentHandler, UpdateOrderStatusCommand,
    UpdateOrderStatusHandler,
};
use crate::domain::foundation::{OrderId, UserId};
use crate::domain::order::OrderError;
use crate::ports::{CartStore, EventPublisher, OrderRepository, PaymentGateway};

use super::dto::{ErrorResponse, OrderResponse, PaymentFailedResponse, UpdateOrderStatusRequest};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all port implementations.
///
/// Cloned per request; dependencies are Arc-wrapped for cheap sharing.
#[derive(Clone)]
pub struct OrderAppState {
    pub cart_store: Arc<dyn CartStore>,
    pub repository: Arc<dyn OrderRepository>,
    pub payment_gateway: Arc<dyn PaymentGateway>,
    pub event_publisher: Arc<dyn EventPublisher>,
}

impl OrderAppState {
    /// Create handlers on demand from the shared state.
    pub fn place_order_handler(&self) -> PlaceOrderHandler {
        PlaceOrderHandler::new(
            self.cart_store.clone(),
            self.repository.clone(),
            self.payment_gateway.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn get_order_handler(&self) -> GetOrderHandler {
        GetOrderHandler::new(self.repository.clone())
    }

    pub fn list_user_orders_handler(&self) -> ListUserOrdersHandler {
        ListUserOrdersHandler::new(self.repository.clone())
    }

    pub fn update_order_status_handler(&self) -> UpdateOrderStatusHandler {
        UpdateOrderStatusHandler::new(self.repository.clone(), self.event_publisher.clone())
    }

    pub fn cancel_order_handler(&self) -> CancelOrderHandler {
        CancelOrderHandler::new(self.repository.clone(), self.event_publisher.clone())
    }

    pub fn retry_payment_handler(&self) -> RetryPaymentHandler {
        RetryPaymentHandler::new(
            self.cart_store.clone(),
            self.repository.clone(),
            self.payment_gateway.clone(),
            self.event_publisher.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Authenticated User Context
// ════════════════════════════════════════════════════════════════════════════════

/// Authenticated user context extracted from the request.
///
/// The upstream gateway terminates authentication and forwards the verified
/// identity in the `X-User-Id` header; this extractor only reads it.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let user_id = parts
                .headers
                .get("X-User-Id")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| UserId::new(s).ok())
                .ok_or(AuthenticationRequired)?;

            Ok(AuthenticatedUser { user_id })
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/orders - place an order from the caller's cart.
///
/// 201 with the paid order; 402 with the order when payment failed so the
/// caller can retry; 400 when the cart is empty.
pub async fn place_order(
    State(state): State<OrderAppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, OrderApiError> {
    let handler = state.place_order_handler();
    let outcome = handler
        .handle(PlaceOrderCommand {
            user_id: user.user_id,
        })
        .await?;

    Ok(placement_response(StatusCode::CREATED, outcome))
}

/// GET /api/orders - list the caller's orders, newest first.
pub async fn list_orders(
    State(state): State<OrderAppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, OrderApiError> {
    let handler = state.list_user_orders_handler();
    let orders = handler
        .handle(ListUserOrdersQuery {
            user_id: user.user_id,
        })
        .await?;

    let response: Vec<OrderResponse> = orders.iter().map(OrderResponse::from).collect();
    Ok(Json(response))
}

/// GET /api/orders/{id} - fetch one order.
pub async fn get_order(
    State(state): State<OrderAppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, OrderApiError> {
    let order_id = parse_order_id(&id)?;
    let handler = state.get_order_handler();
    let order = handler.handle(GetOrderQuery { order_id }).await?;

    Ok(Json(OrderResponse::from(&order)))
}

/// PATCH /api/orders/{id}/status - administrative status transition.
pub async fn update_order_status(
    State(state): State<OrderAppState>,
    _user: AuthenticatedUser, // Would check operator role in production
    Path(id): Path<String>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, OrderApiError> {
    let order_id = parse_order_id(&id)?;
    let handler = state.update_order_status_handler();
    let order = handler
        .handle(UpdateOrderStatusCommand {
            order_id,
            target: request.status,
        })
        .await?;

    Ok(Json(OrderResponse::from(&order)))
}

/// POST /api/orders/{id}/payment/retry - re-drive payment for a failed order.
pub async fn retry_payment(
    State(state): State<OrderAppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, OrderApiError> {
    let order_id = parse_order_id(&id)?;
    let handler = state.retry_payment_handler();
    let outcome = handler.handle(RetryPaymentCommand { order_id }).await?;

    Ok(placement_response(StatusCode::OK, outcome))
}

/// POST /api/orders/{id}/cancel - cancel (or refund) an order.
pub async fn cancel_order(
    State(state): State<OrderAppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, OrderApiError> {
    let order_id = parse_order_id(&id)?;
    let handler = state.cancel_order_handler();
    let result = handler.handle(CancelOrderCommand { order_id }).await?;

    Ok(match result {
        CancelOrderResult::Deleted => StatusCode::NO_CONTENT.into_response(),
        CancelOrderResult::Cancelled(order) | CancelOrderResult::Refunded(order) => {
            Json(OrderResponse::from(&order)).into_response()
        }
    })
}

fn placement_response(success_status: StatusCode, outcome: PlaceOrderOutcome) -> axum::response::Response {
    match outcome {
        PlaceOrderOutcome::Paid(order) => {
            (success_status, Json(OrderResponse::from(&order))).into_response()
        }
        PlaceOrderOutcome::PaymentFailed(order) => (
            StatusCode::PAYMENT_REQUIRED,
            Json(PaymentFailedResponse::new(OrderResponse::from(&order))),
        )
            .into_response(),
    }
}

fn parse_order_id(raw: &str) -> Result<OrderId, OrderApiError> {
    raw.parse::<OrderId>().map_err(|_| {
        OrderApiError(OrderError::Validation(
            crate::domain::foundation::ValidationError::invalid_format(
                "order_id",
                "not a valid order id",
            ),
        ))
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Error mapping
// ════════════════════════════════════════════════════════════════════════════════

/// Newtype wrapper mapping domain errors onto HTTP responses.
pub struct OrderApiError(pub OrderError);

impl From<OrderError> for OrderApiError {
    fn from(err: OrderError) -> Self {
        Self(err)
    }
}

impl IntoResponse for OrderApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self.0 {
            OrderError::EmptyCart(_) => (StatusCode::BAD_REQUEST, "CART_EMPTY"),
            OrderError::NotFound(_) => (StatusCode::NOT_FOUND, "ORDER_NOT_FOUND"),
            OrderError::Conflict { .. } => (StatusCode::CONFLICT, "VERSION_CONFLICT"),
            OrderError::InvalidTransition(_) => (StatusCode::CONFLICT, "INVALID_STATUS_TRANSITION"),
            OrderError::CartUnavailable(_) => (StatusCode::BAD_GATEWAY, "CART_UNAVAILABLE"),
            OrderError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            OrderError::Infrastructure(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse::new(error_code, self.0.message());
        (status, Json(body)).into_response()
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
    use crate::domain::foundation::ProductId;
    use crate::domain::order::OrderStatus;

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn seeded_cart() -> Cart {
        let item = CartItem::new(ProductId::new("P1").unwrap(), 2, 10).unwrap();
        Cart::new(user(), vec![item])
    }

    fn state(cart_store: InMemoryCartStore, gateway: MockPaymentGateway) -> OrderAppState {
        OrderAppState {
            cart_store: Arc::new(cart_store),
            repository: Arc::new(InMemoryOrderRepository::new()),
            payment_gateway: Arc::new(gateway),
            event_publisher: Arc::new(InMemoryEventBus::new()),
        }
    }

    #[tokio::test]
    async fn state_wires_the_placement_handler() {
        let state = state(
            InMemoryCartStore::with_cart(seeded_cart()),
            MockPaymentGateway::paying(),
        );

        let outcome = state
            .place_order_handler()
            .handle(PlaceOrderCommand { user_id: user() })
            .await
            .unwrap();

        assert_eq!(outcome.order().status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn error_mapping_matches_the_contract() {
        let cases = [
            (
                OrderApiError(OrderError::empty_cart(user())),
                StatusCode::BAD_REQUEST,
            ),
            (
                OrderApiError(OrderError::not_found(OrderId::new())),
                StatusCode::NOT_FOUND,
            ),
            (
                OrderApiError(OrderError::conflict(OrderId::new(), 2)),
                StatusCode::CONFLICT,
            ),
            (
                OrderApiError(OrderError::cart_unavailable("down")),
                StatusCode::BAD_GATEWAY,
            ),
            (
                OrderApiError(OrderError::infrastructure("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn invalid_order_id_maps_to_validation_error() {
        let err = parse_order_id("not-a-uuid").unwrap_err();
        assert!(matches!(err.0, OrderError::Validation(_)));
    }
}
