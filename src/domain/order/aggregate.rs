//! Order aggregate entity.
//!
//! # Design Decisions
//!
//! - **Money in cents**: all monetary values are i64 minor units, no floats
//! - **Snapshot items**: order lines are copied from the cart at placement
//!   and never re-read from the live catalog
//! - **Version-guarded mutation**: every mutation to pricing, status, or
//!   payment increments `version` by exactly one; the repository refuses a
//!   write whose expected version is stale

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::cart::{Cart, CartItem};
use crate::domain::foundation::{
    OrderId, ProductId, StateMachine, Timestamp, UserId, ValidationError,
};

use super::{OrderError, OrderStatus};

/// Human-facing unique order number, e.g. `ORD-20260806-1A2B3C4D5E6F`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Derives an order number from the order id and placement date.
    ///
    /// The UUID-derived suffix keeps numbers unique; the database unique
    /// index on the column is the final arbiter.
    pub fn generate(id: &OrderId, placed_at: Timestamp) -> Self {
        let date = placed_at.as_datetime().format("%Y%m%d");
        let suffix: String = id
            .as_uuid()
            .simple()
            .to_string()
            .chars()
            .take(12)
            .collect::<String>()
            .to_uppercase();
        Self(format!("ORD-{}-{}", date, suffix))
    }

    /// Wraps an existing order number, returning error if empty.
    pub fn new(number: impl Into<String>) -> Result<Self, ValidationError> {
        let number = number.into();
        if number.is_empty() {
            return Err(ValidationError::empty_field("order_number"));
        }
        Ok(Self(number))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable snapshot of a cart line at placement time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: Option<String>,
    /// Unit price in minor units, frozen at placement.
    pub price: i64,
    pub image: Option<String>,
    pub quantity: u32,
    /// price × quantity, computed once at placement.
    pub subtotal: i64,
}

impl OrderItem {
    /// Copies a cart line into an order line, computing the subtotal.
    pub fn from_cart_item(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            price: item.price,
            image: item.image.clone(),
            quantity: item.quantity,
            subtotal: item.line_total(),
        }
    }
}

/// Order pricing breakdown in minor units.
///
/// Invariant: `total == subtotal - discount + tax + shipping_fee`.
/// Construct through [`Pricing::compute`] so the invariant cannot drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    pub subtotal: i64,
    pub tax: i64,
    pub discount: i64,
    pub shipping_fee: i64,
    pub total: i64,
}

impl Pricing {
    /// Builds a pricing breakdown with the total derived from the parts.
    pub fn compute(subtotal: i64, tax: i64, discount: i64, shipping_fee: i64) -> Self {
        Self {
            subtotal,
            tax,
            discount,
            shipping_fee,
            total: subtotal - discount + tax + shipping_fee,
        }
    }

    /// Pricing for a bare item subtotal: no tax, discount, or shipping.
    pub fn from_subtotal(subtotal: i64) -> Self {
        Self::compute(subtotal, 0, 0, 0)
    }

    /// Checks the total against its components.
    pub fn is_consistent(&self) -> bool {
        self.total == self.subtotal - self.discount + self.tax + self.shipping_fee
    }
}

/// Payment details, attached once a payment attempt has captured money.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Payment method as reported by the gateway, when it reports one.
    pub method: Option<String>,
    /// Gateway transaction reference.
    pub transaction_id: Option<String>,
    /// When the payment completed.
    pub paid_at: Timestamp,
    /// Captured amount in minor units.
    pub amount: i64,
}

/// Order aggregate - a durable, priced snapshot of a cart.
///
/// # Invariants
///
/// - Never created from an empty cart
/// - `user_id` and `items` are immutable after creation
/// - `version` starts at 1 and increases by exactly one per mutation
/// - Status moves only along the [`OrderStatus`] transition table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: OrderNumber,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub pricing: Pricing,
    pub status: OrderStatus,
    pub payment: Option<PaymentRecord>,
    pub version: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    /// Creates a Pending order from a cart snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::EmptyCart`] when the cart has no items - an
    /// order is never created from an empty cart.
    pub fn from_cart(id: OrderId, cart: &Cart, placed_at: Timestamp) -> Result<Self, OrderError> {
        if cart.is_empty() {
            return Err(OrderError::empty_cart(cart.user_id.clone()));
        }

        let items: Vec<OrderItem> = cart.items.iter().map(OrderItem::from_cart_item).collect();
        let subtotal = items.iter().map(|i| i.subtotal).sum();

        Ok(Self {
            id,
            order_number: OrderNumber::generate(&id, placed_at),
            user_id: cart.user_id.clone(),
            items,
            pricing: Pricing::from_subtotal(subtotal),
            status: OrderStatus::Pending,
            payment: None,
            version: 1,
            created_at: placed_at,
            updated_at: placed_at,
        })
    }

    /// True once any payment attempt has been made against this order.
    ///
    /// A Pending order has seen no attempt; every payment branch moves the
    /// status away from Pending before returning.
    pub fn payment_attempted(&self) -> bool {
        !matches!(self.status, OrderStatus::Pending)
    }

    /// Transitions to Paid and attaches the payment record.
    ///
    /// # Errors
    ///
    /// Returns error if Paid is not reachable from the current status.
    pub fn mark_paid(&mut self, payment: PaymentRecord, now: Timestamp) -> Result<(), OrderError> {
        self.status = self.status.transition_to(OrderStatus::Paid)?;
        self.payment = Some(payment);
        self.bump(now);
        Ok(())
    }

    /// Transitions to PaymentFailed after a rejected or unavailable payment.
    ///
    /// # Errors
    ///
    /// Returns error if PaymentFailed is not reachable from the current status.
    pub fn mark_payment_failed(&mut self, now: Timestamp) -> Result<(), OrderError> {
        self.status = self.status.transition_to(OrderStatus::PaymentFailed)?;
        self.bump(now);
        Ok(())
    }

    /// Re-enters PaymentPending for a payment retry.
    ///
    /// # Errors
    ///
    /// Returns error unless the order is currently PaymentFailed.
    pub fn begin_payment_retry(&mut self, now: Timestamp) -> Result<(), OrderError> {
        self.status = self.status.transition_to(OrderStatus::PaymentPending)?;
        self.bump(now);
        Ok(())
    }

    /// Performs a validated administrative status transition.
    ///
    /// # Errors
    ///
    /// Returns error if the target is not in the transition table for the
    /// current status.
    pub fn transition_status(
        &mut self,
        target: OrderStatus,
        now: Timestamp,
    ) -> Result<(), OrderError> {
        self.status = self.status.transition_to(target)?;
        self.bump(now);
        Ok(())
    }

    fn bump(&mut self, now: Timestamp) {
        self.version += 1;
        self.updated_at = now;
    }
}
