//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between the
//! domain and the outside world. Adapters implement these ports.
//!
//! - `CartStore` - the cart collaborator (fetch and clear per-user carts)
//! - `PaymentGateway` - the payment collaborator (create payments)
//! - `EventPublisher` - fire-and-forget notification sink
//! - `OrderRepository` - durable order storage with version-guarded updates

mod cart_store;
mod event_publisher;
mod order_repository;
mod payment_gateway;

pub use cart_store::{CartStore, CartStoreError};
pub use event_publisher::{EventPublisher, PublishError};
pub use order_repository::{OrderRepository, OrderRepositoryError};
pub use payment_gateway::{PaymentGateway, PaymentGatewayError, PaymentOutcome, PaymentStatus};
