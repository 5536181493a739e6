//! Collaborator service configuration (cart and payment).

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Cart service collaborator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CartServiceConfig {
    /// Base URL of the cart service.
    #[serde(default = "default_cart_url")]
    pub base_url: String,
}

impl CartServiceConfig {
    /// Validate the cart service configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_base_url(&self.base_url, "cart.base_url")
    }
}

impl Default for CartServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_cart_url(),
        }
    }
}

/// Payment service collaborator configuration.
///
/// The payment call carries its own deadline: a hung gateway must not hang
/// the placement flow, and a timed-out attempt maps to a failed payment.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentServiceConfig {
    /// Base URL of the payment service.
    #[serde(default = "default_payment_url")]
    pub base_url: String,

    /// Per-request deadline in seconds.
    #[serde(default = "default_payment_timeout")]
    pub timeout_secs: u64,
}

impl PaymentServiceConfig {
    /// Get the per-request deadline as Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the payment service configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_base_url(&self.base_url, "payment.base_url")?;
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for PaymentServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_payment_url(),
            timeout_secs: default_payment_timeout(),
        }
    }
}

fn validate_base_url(url: &str, field: &'static str) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Err(ValidationError::MissingRequired(field));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ValidationError::InvalidServiceUrl(field));
    }
    Ok(())
}

fn default_cart_url() -> String {
    "http://localhost:5002".to_string()
}

fn default_payment_url() -> String {
    "http://localhost:5003".to_string()
}

fn default_payment_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_collaborators() {
        let cart = CartServiceConfig::default();
        let payment = PaymentServiceConfig::default();

        assert!(cart.validate().is_ok());
        assert!(payment.validate().is_ok());
        assert_eq!(payment.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn non_http_url_is_rejected() {
        let cart = CartServiceConfig {
            base_url: "ftp://cart".to_string(),
        };
        assert!(cart.validate().is_err());
    }

    #[test]
    fn zero_payment_timeout_is_rejected() {
        let payment = PaymentServiceConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(payment.validate().is_err());
    }
}
