//! HTTP client for the cart service.
//!
//! Speaks the cart service's JSON dialect (camelCase fields, prices in
//! minor units) and maps it onto the domain `Cart` snapshot.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::cart::{Cart, CartItem};
use crate::domain::foundation::{ProductId, Timestamp, UserId};
use crate::ports::{CartStore, CartStoreError};

/// Cart service client over HTTP.
pub struct HttpCartStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCartStore {
    /// Creates a client against the given base URL (no trailing slash needed).
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn cart_url(&self, user_id: &UserId) -> String {
        format!("{}/cart/{}", self.base_url, user_id)
    }
}

#[async_trait]
impl CartStore for HttpCartStore {
    async fn fetch_cart(&self, user_id: &UserId) -> Result<Option<Cart>, CartStoreError> {
        let response = self
            .client
            .get(self.cart_url(user_id))
            .send()
            .await
            .map_err(request_error)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(CartStoreError::Unavailable(format!(
                "cart service returned {}",
                response.status()
            )));
        }

        let payload: CartPayload = response
            .json()
            .await
            .map_err(|e| CartStoreError::Malformed(e.to_string()))?;

        cart_from_payload(payload).map(Some)
    }

    async fn clear_cart(&self, user_id: &UserId) -> Result<(), CartStoreError> {
        let response = self
            .client
            .delete(self.cart_url(user_id))
            .send()
            .await
            .map_err(request_error)?;

        // 404 means there was nothing to clear; clearing is idempotent.
        if response.status().is_success() || response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        Err(CartStoreError::Unavailable(format!(
            "cart service returned {}",
            response.status()
        )))
    }
}

fn request_error(err: reqwest::Error) -> CartStoreError {
    if err.is_decode() {
        CartStoreError::Malformed(err.to_string())
    } else {
        CartStoreError::Unavailable(err.to_string())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Wire payloads
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartPayload {
    user_id: String,
    #[serde(default)]
    items: Vec<CartItemPayload>,
    #[serde(default)]
    total_quantity: Option<u32>,
    #[serde(default)]
    total_price: Option<i64>,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartItemPayload {
    product_id: String,
    quantity: u32,
    price: i64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

fn cart_from_payload(payload: CartPayload) -> Result<Cart, CartStoreError> {
    let user_id = UserId::new(payload.user_id)
        .map_err(|e| CartStoreError::Malformed(e.to_string()))?;

    let items = payload
        .items
        .into_iter()
        .map(|item| {
            let product_id = ProductId::new(item.product_id)
                .map_err(|e| CartStoreError::Malformed(e.to_string()))?;
            let mut cart_item = CartItem::new(product_id, item.quantity, item.price)
                .map_err(|e| CartStoreError::Malformed(e.to_string()))?;
            cart_item.name = item.name;
            cart_item.image = item.image;
            Ok(cart_item)
        })
        .collect::<Result<Vec<_>, CartStoreError>>()?;

    let mut cart = Cart::new(user_id, items);
    // Prefer the service's own derived totals when present so a drifted
    // upstream total is still visible to consistency checks.
    if let Some(quantity) = payload.total_quantity {
        cart.total_quantity = quantity;
    }
    if let Some(price) = payload.total_price {
        cart.total_price = price;
    }
    cart.expires_at = payload.expires_at.map(Timestamp::from_datetime);
    Ok(cart)
}
