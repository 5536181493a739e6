//! Cart snapshot types.
//!
//! Prices here are snapshots taken when the item was added to the cart, in
//! integer minor units (cents). The order is priced from this snapshot, not
//! from the live catalog, so the user pays what they saw.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ProductId, Timestamp, UserId, ValidationError};

/// A single line in a user's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product this line refers to.
    pub product_id: ProductId,

    /// Units of the product. Always positive.
    pub quantity: u32,

    /// Unit price snapshot at add-time, in minor units.
    pub price: i64,

    /// Display name snapshot (optional).
    pub name: Option<String>,

    /// Display image snapshot (optional).
    pub image: Option<String>,
}

impl CartItem {
    /// Creates a cart item, validating quantity and price.
    pub fn new(product_id: ProductId, quantity: u32, price: i64) -> Result<Self, ValidationError> {
        if quantity == 0 {
            return Err(ValidationError::not_positive("quantity", 0));
        }
        if price < 0 {
            return Err(ValidationError::not_positive("price", price));
        }
        Ok(Self {
            product_id,
            quantity,
            price,
            name: None,
            image: None,
        })
    }

    /// Price × quantity for this line, in minor units.
    pub fn line_total(&self) -> i64 {
        self.price * i64::from(self.quantity)
    }
}

/// Point-in-time snapshot of a user's cart.
///
/// `total_quantity` and `total_price` are derived values maintained by the
/// cart service; [`Cart::totals_consistent`] checks they still equal the sum
/// over items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Owner of the cart. One cart per user.
    pub user_id: UserId,

    /// Ordered line items.
    pub items: Vec<CartItem>,

    /// Derived: sum of item quantities.
    pub total_quantity: u32,

    /// Derived: sum of item line totals, in minor units.
    pub total_price: i64,

    /// Optional TTL; the cart service garbage-collects the cart after this
    /// instant regardless of order-placement activity.
    pub expires_at: Option<Timestamp>,
}

impl Cart {
    /// Creates a cart snapshot with derived totals computed from the items.
    pub fn new(user_id: UserId, items: Vec<CartItem>) -> Self {
        let total_quantity = items.iter().map(|i| i.quantity).sum();
        let total_price = items.iter().map(CartItem::line_total).sum();
        Self {
            user_id,
            items,
            total_quantity,
            total_price,
            expires_at: None,
        }
    }

    /// True when the cart holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of price × quantity over the snapshot items, in minor units.
    ///
    /// Computed from the items, never from the stored totals, so a stale
    /// `total_price` cannot leak into an order.
    pub fn total_amount(&self) -> i64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Checks the derived totals against the item sums.
    pub fn totals_consistent(&self) -> bool {
        let quantity: u32 = self.items.iter().map(|i| i.quantity).sum();
        quantity == self.total_quantity && self.total_amount() == self.total_price
    }

    /// True when the cart's TTL has passed at `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at.map(|at| at <= now).unwrap_or(false)
    }
}
