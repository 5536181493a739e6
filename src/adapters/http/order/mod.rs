//! Order HTTP module: DTOs, handlers, and router.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{AuthenticatedUser, OrderApiError, OrderAppState};
pub use routes::{order_router, order_routes};
