//! HTTP DTOs (Data Transfer Objects) for order endpoints.
//!
//! These types define the JSON request/response structure for the order API.
//! They serve as the boundary between HTTP and the application layer.

use serde::{Deserialize, Serialize};

use crate::domain::order::{Order, OrderItem, OrderStatus, PaymentRecord, Pricing};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to transition an order's status administratively.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderStatusRequest {
    /// Target status, e.g. "SHIPPED".
    pub status: OrderStatus,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Full order view for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub order_number: String,
    pub user_id: String,
    pub items: Vec<OrderItemResponse>,
    pub pricing: PricingResponse,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentResponse>,
    pub version: i64,
    /// ISO 8601.
    pub created_at: String,
    /// ISO 8601.
    pub updated_at: String,
}

/// One order line.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub quantity: u32,
    pub subtotal: i64,
}

/// Pricing breakdown in minor units.
#[derive(Debug, Clone, Serialize)]
pub struct PricingResponse {
    pub subtotal: i64,
    pub tax: i64,
    pub discount: i64,
    pub shipping_fee: i64,
    pub total: i64,
}

/// Payment details once an attempt has captured money.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    /// ISO 8601.
    pub paid_at: String,
    pub amount: i64,
}

/// Body of the 402 response for a failed payment: the caller gets the order
/// (and its id) back so it can drive the retry path.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentFailedResponse {
    pub message: String,
    pub order: OrderResponse,
}

impl PaymentFailedResponse {
    pub fn new(order: OrderResponse) -> Self {
        Self {
            message: "Payment failed".to_string(),
            order,
        }
    }
}

/// Standard error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            order_number: order.order_number.to_string(),
            user_id: order.user_id.to_string(),
            items: order.items.iter().map(OrderItemResponse::from).collect(),
            pricing: PricingResponse::from(&order.pricing),
            status: order.status,
            payment: order.payment.as_ref().map(PaymentResponse::from),
            version: order.version,
            created_at: order.created_at.as_datetime().to_rfc3339(),
            updated_at: order.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

impl From<&OrderItem> for OrderItemResponse {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_id: item.product_id.to_string(),
            name: item.name.clone(),
            price: item.price,
            image: item.image.clone(),
            quantity: item.quantity,
            subtotal: item.subtotal,
        }
    }
}

impl From<&Pricing> for PricingResponse {
    fn from(pricing: &Pricing) -> Self {
        Self {
            subtotal: pricing.subtotal,
            tax: pricing.tax,
            discount: pricing.discount,
            shipping_fee: pricing.shipping_fee,
            total: pricing.total,
        }
    }
}

impl From<&PaymentRecord> for PaymentResponse {
    fn from(payment: &PaymentRecord) -> Self {
        Self {
            method: payment.method.clone(),
            transaction_id: payment.transaction_id.clone(),
            paid_at: payment.paid_at.as_datetime().to_rfc3339(),
            amount: payment.amount,
        }
    }
}
