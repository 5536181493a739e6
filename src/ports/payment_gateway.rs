//! PaymentGateway port - contract with the payment collaborator.
//!
//! The gateway is the highest-latency, highest-failure-risk dependency in
//! the placement flow. Callers treat every error - network, timeout, or
//! explicit rejection - as a failed payment: fail closed on ambiguity.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::OrderId;

/// Port for creating payments against an order.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Asks the gateway to capture `amount` (minor units) for the order.
    ///
    /// A returned error means the attempt's outcome is unknown or the
    /// service was unreachable; the orchestrator normalizes both to a
    /// failed outcome.
    async fn create_payment(
        &self,
        order_id: &OrderId,
        amount: i64,
    ) -> Result<PaymentOutcome, PaymentGatewayError>;
}

/// Result of a payment attempt as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub status: PaymentStatus,

    /// Gateway transaction reference, present on success.
    #[serde(default)]
    pub transaction_id: Option<String>,

    /// Payment method, when the gateway reports one.
    #[serde(default)]
    pub method: Option<String>,
}

impl PaymentOutcome {
    /// A successful outcome with a transaction reference.
    pub fn paid(transaction_id: impl Into<String>) -> Self {
        Self {
            status: PaymentStatus::Paid,
            transaction_id: Some(transaction_id.into()),
            method: None,
        }
    }

    /// A failed outcome.
    pub fn failed() -> Self {
        Self {
            status: PaymentStatus::Failed,
            transaction_id: None,
            method: None,
        }
    }

    /// True unless the gateway reported failure.
    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }
}

/// Gateway-reported payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Paid,
    Failed,
}

/// Errors from the payment collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentGatewayError {
    /// The service could not be reached.
    #[error("payment service unreachable: {0}")]
    Network(String),

    /// The request exceeded its deadline; the outcome is unknown.
    #[error("payment request timed out")]
    Timeout,

    /// The service answered with a payload we could not interpret.
    #[error("payment service returned malformed payload: {0}")]
    Malformed(String),
}
