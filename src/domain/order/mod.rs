//! Order context - the aggregate this service owns.
//!
//! An order is a durable, priced snapshot of a cart, moved through a status
//! state machine by the placement orchestrator and administrative
//! transitions. Every persisted mutation is guarded by the aggregate's
//! version counter.

mod aggregate;
mod errors;
mod events;
mod status;

pub use aggregate::{Order, OrderItem, OrderNumber, PaymentRecord, Pricing};
pub use errors::OrderError;
pub use events::OrderEvent;
pub use status::OrderStatus;
