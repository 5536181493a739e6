//! CartStore port - contract with the cart collaborator.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::cart::Cart;
use crate::domain::foundation::UserId;
use crate::domain::order::OrderError;

/// Port for the cart service, which owns the authoritative per-user cart.
///
/// Implementations must ensure `clear_cart` is idempotent: clearing an
/// already-empty or non-existent cart is not an error.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Fetches the user's cart snapshot. `None` when the user has no cart.
    async fn fetch_cart(&self, user_id: &UserId) -> Result<Option<Cart>, CartStoreError>;

    /// Clears the user's cart. Idempotent.
    async fn clear_cart(&self, user_id: &UserId) -> Result<(), CartStoreError>;
}

/// Errors from the cart collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartStoreError {
    /// The service could not be reached or timed out.
    #[error("cart service unreachable: {0}")]
    Unavailable(String),

    /// The service answered with a payload we could not interpret.
    #[error("cart service returned malformed payload: {0}")]
    Malformed(String),
}

impl From<CartStoreError> for OrderError {
    fn from(err: CartStoreError) -> Self {
        OrderError::cart_unavailable(err.to_string())
    }
}
