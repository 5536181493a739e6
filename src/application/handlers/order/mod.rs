//! Order command and query handlers.
//!
//! `place_order` is the placement orchestrator; the rest are the read and
//! administrative operations around the order lifecycle.

mod cancel_order;
mod get_order;
mod list_user_orders;
mod place_order;
mod retry_payment;
mod update_order_status;

pub use cancel_order::{CancelOrderCommand, CancelOrderHandler, CancelOrderResult};
pub use get_order::{GetOrderHandler, GetOrderQuery};
pub use list_user_orders::{ListUserOrdersHandler, ListUserOrdersQuery};
pub use place_order::{PlaceOrderCommand, PlaceOrderHandler, PlaceOrderOutcome};
pub use retry_payment::{RetryPaymentCommand, RetryPaymentHandler};
pub use update_order_status::{UpdateOrderStatusCommand, UpdateOrderStatusHandler};
