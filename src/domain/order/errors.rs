//! Order-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | EmptyCart | 400 |
//! | NotFound | 404 |
//! | Conflict | 409 |
//! | InvalidTransition | 409 |
//! | CartUnavailable | 502 |
//! | Validation | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{OrderId, TransitionError, UserId, ValidationError};

/// Errors surfaced by order operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// The user's cart is absent or has no items; nothing was written.
    EmptyCart(UserId),

    /// Order was not found.
    NotFound(OrderId),

    /// A conditional update lost to a concurrent writer: the stored version
    /// no longer matches the caller's expected version.
    Conflict {
        order_id: OrderId,
        expected_version: i64,
    },

    /// Requested status change is not in the transition table.
    InvalidTransition(TransitionError),

    /// The cart collaborator could not be reached or answered garbage.
    CartUnavailable(String),

    /// Input failed value-object validation.
    Validation(ValidationError),

    /// Storage or other infrastructure failure.
    Infrastructure(String),
}

impl OrderError {
    pub fn empty_cart(user_id: UserId) -> Self {
        OrderError::EmptyCart(user_id)
    }

    pub fn not_found(order_id: OrderId) -> Self {
        OrderError::NotFound(order_id)
    }

    pub fn conflict(order_id: OrderId, expected_version: i64) -> Self {
        OrderError::Conflict {
            order_id,
            expected_version,
        }
    }

    pub fn cart_unavailable(reason: impl Into<String>) -> Self {
        OrderError::CartUnavailable(reason.into())
    }

    pub fn infrastructure(reason: impl Into<String>) -> Self {
        OrderError::Infrastructure(reason.into())
    }

    /// Human-readable message for API responses and logs.
    pub fn message(&self) -> String {
        match self {
            OrderError::EmptyCart(user_id) => {
                format!("Cart for user {} is empty", user_id)
            }
            OrderError::NotFound(order_id) => {
                format!("Order {} not found", order_id)
            }
            OrderError::Conflict {
                order_id,
                expected_version,
            } => format!(
                "Order {} was modified concurrently (expected version {})",
                order_id, expected_version
            ),
            OrderError::InvalidTransition(err) => err.to_string(),
            OrderError::CartUnavailable(reason) => {
                format!("Cart service unavailable: {}", reason)
            }
            OrderError::Validation(err) => err.to_string(),
            OrderError::Infrastructure(reason) => reason.clone(),
        }
    }
}

impl std::fmt::Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for OrderError {}

impl From<TransitionError> for OrderError {
    fn from(err: TransitionError) -> Self {
        OrderError::InvalidTransition(err)
    }
}

impl From<ValidationError> for OrderError {
    fn from(err: ValidationError) -> Self {
        OrderError::Validation(err)
    }
}
