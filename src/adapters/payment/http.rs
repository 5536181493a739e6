//! HTTP client for the payment service.
//!
//! The payment call is the highest-latency, highest-failure-risk outbound
//! call in the placement flow, so every request carries an explicit
//! deadline. A timed-out request reports `Timeout` and the caller fails
//! closed rather than leaving the order in limbo.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::OrderId;
use crate::ports::{PaymentGateway, PaymentGatewayError, PaymentOutcome, PaymentStatus};

/// Payment service client over HTTP.
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatePaymentBody {
    order_id: String,
    amount: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentResponseBody {
    status: PaymentStatus,
    #[serde(default)]
    transaction_id: Option<String>,
    #[serde(default)]
    method: Option<String>,
}

impl From<PaymentResponseBody> for PaymentOutcome {
    fn from(body: PaymentResponseBody) -> Self {
        Self {
            status: body.status,
            transaction_id: body.transaction_id,
            method: body.method,
        }
    }
}

impl HttpPaymentGateway {
    /// Creates a client against the given base URL with a per-request deadline.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            timeout,
        }
    }

    fn payments_url(&self) -> String {
        format!("{}/payments", self.base_url)
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_payment(
        &self,
        order_id: &OrderId,
        amount: i64,
    ) -> Result<PaymentOutcome, PaymentGatewayError> {
        let body = CreatePaymentBody {
            order_id: order_id.to_string(),
            amount,
        };

        let response = self
            .client
            .post(self.payments_url())
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        // The payment service reports rejections in the body (status FAILED),
        // sometimes alongside a non-2xx code; parse the body either way.
        match response.json::<PaymentResponseBody>().await {
            Ok(body) => Ok(body.into()),
            Err(_) if !status.is_success() => Err(PaymentGatewayError::Malformed(format!(
                "payment service returned {}",
                status
            ))),
            Err(e) => Err(PaymentGatewayError::Malformed(e.to_string())),
        }
    }
}

fn request_error(err: reqwest::Error) -> PaymentGatewayError {
    if err.is_timeout() {
        PaymentGatewayError::Timeout
    } else {
        PaymentGatewayError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_wire_casing() {
        let body = CreatePaymentBody {
            order_id: "o-1".into(),
            amount: 2000,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["orderId"], "o-1");
        assert_eq!(json["amount"], 2000);
    }

    #[test]
    fn outcome_parses_from_service_response() {
        let body: PaymentResponseBody =
            serde_json::from_str(r#"{"status":"PAID","transactionId":"txn-9"}"#).unwrap();
        let outcome: PaymentOutcome = body.into();
        assert!(outcome.is_paid());
        assert_eq!(outcome.transaction_id.as_deref(), Some("txn-9"));
    }

    #[test]
    fn rejection_body_parses_without_transaction() {
        let body: PaymentResponseBody = serde_json::from_str(r#"{"status":"FAILED"}"#).unwrap();
        let outcome: PaymentOutcome = body.into();
        assert!(!outcome.is_paid());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let gateway = HttpPaymentGateway::new(
            reqwest::Client::new(),
            "http://payment:5003/",
            Duration::from_secs(10),
        );
        assert_eq!(gateway.payments_url(), "http://payment:5003/payments");
    }
}
