//! OrderRepository port - durable order storage.
//!
//! The conditional update is the only legal way to mutate an order's
//! status, pricing, or payment fields: the store compares the caller's
//! expected version against the stored one and refuses stale writes instead
//! of overwriting them.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{OrderId, UserId};
use crate::domain::order::{Order, OrderError};

/// Port for the durable order store.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists a freshly created order. Fails if the id already exists.
    async fn create(&self, order: &Order) -> Result<(), OrderRepositoryError>;

    /// Looks up an order by id.
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderRepositoryError>;

    /// Lists a user's orders, newest first.
    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Order>, OrderRepositoryError>;

    /// Persists a mutated order iff the stored version equals
    /// `expected_version` (compare-and-swap).
    ///
    /// The aggregate has already incremented `order.version`; callers pass
    /// the version the mutation started from. A mismatch means a concurrent
    /// writer won and the caller's copy is stale.
    async fn update_conditional(
        &self,
        order: &Order,
        expected_version: i64,
    ) -> Result<(), OrderRepositoryError>;

    /// Removes an order outright.
    ///
    /// Only the cancel path for orders that never reached a payment attempt
    /// may call this; every other failure is handled by a forward status
    /// transition.
    async fn delete(&self, id: &OrderId) -> Result<(), OrderRepositoryError>;
}

/// Errors from the order store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderRepositoryError {
    /// The stored version did not match the caller's expected version.
    #[error("version conflict on order {order_id}: expected {expected_version}")]
    Conflict {
        order_id: OrderId,
        expected_version: i64,
    },

    /// No order with the given id.
    #[error("order {0} not found")]
    NotFound(OrderId),

    /// Underlying storage failure.
    #[error("order storage error: {0}")]
    Storage(String),
}

impl From<OrderRepositoryError> for OrderError {
    fn from(err: OrderRepositoryError) -> Self {
        match err {
            OrderRepositoryError::Conflict {
                order_id,
                expected_version,
            } => OrderError::conflict(order_id, expected_version),
            OrderRepositoryError::NotFound(id) => OrderError::not_found(id),
            OrderRepositoryError::Storage(reason) => OrderError::infrastructure(reason),
        }
    }
}
