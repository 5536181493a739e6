//! In-memory cart store for tests and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::cart::Cart;
use crate::domain::foundation::UserId;
use crate::ports::{CartStore, CartStoreError};

/// In-memory cart store keyed by user.
///
/// Failure injection flags let tests exercise the unavailable-collaborator
/// paths without a network.
pub struct InMemoryCartStore {
    carts: RwLock<HashMap<UserId, Cart>>,
    fail_fetch: bool,
    fail_clear: bool,
}

impl InMemoryCartStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            carts: RwLock::new(HashMap::new()),
            fail_fetch: false,
            fail_clear: false,
        }
    }

    /// Creates a store pre-seeded with one cart.
    pub fn with_cart(cart: Cart) -> Self {
        let store = Self::new();
        store.insert(cart);
        store
    }

    /// Creates a store whose fetches fail.
    pub fn failing_fetch() -> Self {
        Self {
            carts: RwLock::new(HashMap::new()),
            fail_fetch: true,
            fail_clear: false,
        }
    }

    /// Creates a store (optionally pre-seeded) whose clears fail.
    pub fn failing_clear(cart: Cart) -> Self {
        let store = Self {
            carts: RwLock::new(HashMap::new()),
            fail_fetch: false,
            fail_clear: true,
        };
        store.insert(cart);
        store
    }

    /// Inserts or replaces a cart.
    pub fn insert(&self, cart: Cart) {
        self.carts
            .write()
            .expect("InMemoryCartStore: carts write lock poisoned")
            .insert(cart.user_id.clone(), cart);
    }

    /// Returns the current cart for a user, for test assertions.
    pub fn cart(&self, user_id: &UserId) -> Option<Cart> {
        self.carts
            .read()
            .expect("InMemoryCartStore: carts lock poisoned")
            .get(user_id)
            .cloned()
    }
}

impl Default for InMemoryCartStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn fetch_cart(&self, user_id: &UserId) -> Result<Option<Cart>, CartStoreError> {
        if self.fail_fetch {
            return Err(CartStoreError::Unavailable("simulated fetch failure".into()));
        }
        Ok(self.cart(user_id))
    }

    async fn clear_cart(&self, user_id: &UserId) -> Result<(), CartStoreError> {
        if self.fail_clear {
            return Err(CartStoreError::Unavailable("simulated clear failure".into()));
        }
        // Removing an absent cart is fine: clearing is idempotent.
        self.carts
            .write()
            .expect("InMemoryCartStore: carts write lock poisoned")
            .remove(user_id);
        Ok(())
    }
}
