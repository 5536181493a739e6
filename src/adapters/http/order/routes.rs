//! Axum router configuration for order endpoints.

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::handlers::{
    cancel_order, get_order, list_orders, place_order, retry_payment, update_order_status,
    OrderAppState,
};

/// Create the order API router.
///
/// # Routes
///
/// All routes require the authenticated user header.
///
/// - `POST /` - Place an order from the caller's cart
/// - `GET /` - List the caller's orders, newest first
/// - `GET /{id}` - Fetch one order
/// - `PATCH /{id}/status` - Administrative status transition
/// - `POST /{id}/payment/retry` - Retry payment on a failed order
/// - `POST /{id}/cancel` - Cancel (or refund) an order
pub fn order_routes() -> Router<OrderAppState> {
    Router::new()
        .route("/", post(place_order).get(list_orders))
        .route("/:id", get(get_order))
        .route("/:id/status", patch(update_order_status))
        .route("/:id/payment/retry", post(retry_payment))
        .route("/:id/cancel", post(cancel_order))
}

/// Create the order module router, suitable for mounting at `/api`.
pub fn order_router() -> Router<OrderAppState> {
    Router::new().nest("/orders", order_routes())
}
