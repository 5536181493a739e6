//! Configurable mock payment gateway for tests and local development.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::foundation::OrderId;
use crate::ports::{PaymentGateway, PaymentGatewayError, PaymentOutcome, PaymentStatus};

/// Mock gateway returning a pre-configured outcome and recording calls.
pub struct MockPaymentGateway {
    result: Result<PaymentOutcome, PaymentGatewayError>,
    calls: Mutex<Vec<(OrderId, i64)>>,
}

impl MockPaymentGateway {
    /// Gateway that approves every payment.
    pub fn paying() -> Self {
        Self::with_result(Ok(PaymentOutcome {
            status: PaymentStatus::Paid,
            transaction_id: Some("txn-mock-1".to_string()),
            method: Some("card".to_string()),
        }))
    }

    /// Gateway that rejects every payment.
    pub fn failing() -> Self {
        Self::with_result(Ok(PaymentOutcome::failed()))
    }

    /// Gateway whose calls error out before producing an outcome.
    pub fn erroring(err: PaymentGatewayError) -> Self {
        Self::with_result(Err(err))
    }

    fn with_result(result: Result<PaymentOutcome, PaymentGatewayError>) -> Self {
        Self {
            result,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Recorded (order id, amount) pairs, in call order.
    pub fn calls(&self) -> Vec<(OrderId, i64)> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of payment attempts made against this gateway.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_payment(
        &self,
        order_id: &OrderId,
        amount: i64,
    ) -> Result<PaymentOutcome, PaymentGatewayError> {
        self.calls.lock().unwrap().push((*order_id, amount));
        self.result.clone()
    }
}
