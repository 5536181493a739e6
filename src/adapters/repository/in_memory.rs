//! In-memory order repository for tests and local development.
//!
//! Implements the same compare-and-swap discipline as the PostgreSQL
//! adapter: a conditional update only lands when the stored version matches
//! the caller's expected version.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::foundation::{OrderId, UserId};
use crate::domain::order::Order;
use crate::ports::{OrderRepository, OrderRepositoryError};

/// In-memory order store keyed by order id.
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<OrderId, Order>>,
    fail_writes: bool,
}

impl InMemoryOrderRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
            fail_writes: false,
        }
    }

    /// Creates a repository whose writes fail, for failure-path tests.
    pub fn failing() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
            fail_writes: true,
        }
    }

    /// Returns the stored order, for test assertions.
    pub fn get(&self, id: &OrderId) -> Option<Order> {
        self.orders
            .read()
            .expect("InMemoryOrderRepository: orders lock poisoned")
            .get(id)
            .cloned()
    }

    /// Number of stored orders.
    pub fn count(&self) -> usize {
        self.orders
            .read()
            .expect("InMemoryOrderRepository: orders lock poisoned")
            .len()
    }
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, order: &Order) -> Result<(), OrderRepositoryError> {
        if self.fail_writes {
            return Err(OrderRepositoryError::Storage(
                "simulated create failure".into(),
            ));
        }
        let mut orders = self
            .orders
            .write()
            .expect("InMemoryOrderRepository: orders write lock poisoned");
        if orders.contains_key(&order.id) {
            return Err(OrderRepositoryError::Storage(format!(
                "duplicate order id {}",
                order.id
            )));
        }
        orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        Ok(self.get(id))
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Order>, OrderRepositoryError> {
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .expect("InMemoryOrderRepository: orders lock poisoned")
            .values()
            .filter(|o| &o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn update_conditional(
        &self,
        order: &Order,
        expected_version: i64,
    ) -> Result<(), OrderRepositoryError> {
        if self.fail_writes {
            return Err(OrderRepositoryError::Storage(
                "simulated update failure".into(),
            ));
        }
        let mut orders = self
            .orders
            .write()
            .expect("InMemoryOrderRepository: orders write lock poisoned");
        let stored = orders
            .get_mut(&order.id)
            .ok_or(OrderRepositoryError::NotFound(order.id))?;
        if stored.version != expected_version {
            return Err(OrderRepositoryError::Conflict {
                order_id: order.id,
                expected_version,
            });
        }
        *stored = order.clone();
        Ok(())
    }

    async fn delete(&self, id: &OrderId) -> Result<(), OrderRepositoryError> {
        let mut orders = self
            .orders
            .write()
            .expect("InMemoryOrderRepository: orders write lock poisoned");
        orders
            .remove(id)
            .map(|_| ())
            .ok_or(OrderRepositoryError::NotFound(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::{Cart, CartItem};
    use crate::domain::foundation::{ProductId, Timestamp};

    fn sample_order() -> Order {
        let item = CartItem::new(ProductId::new("P1").unwrap(), 2, 1000).unwrap();
        let cart = Cart::new(UserId::new("user-1").unwrap(), vec![item]);
        Order::from_cart(OrderId::new(), &cart, Timestamp::now()).unwrap()
    }

    #[tokio::test]
    async fn create_then_find_round_trips() {
        let repo = InMemoryOrderRepository::new();
        let order = sample_order();

        repo.create(&order).await.unwrap();

        let found = repo.find_by_id(&order.id).await.unwrap().unwrap();
        assert_eq!(found, order);
    }

    #[tokio::test]
    async fn create_rejects_duplicate_ids() {
        let repo = InMemoryOrderRepository::new();
        let order = sample_order();

        repo.create(&order).await.unwrap();
        assert!(repo.create(&order).await.is_err());
    }

    #[tokio::test]
    async fn conditional_update_lands_when_versions_match() {
        let repo = InMemoryOrderRepository::new();
        let mut order = sample_order();
        repo.create(&order).await.unwrap();

        let expected = order.version;
        order.mark_payment_failed(Timestamp::now()).unwrap();
        repo.update_conditional(&order, expected).await.unwrap();

        assert_eq!(repo.get(&order.id).unwrap().version, 2);
    }

    #[tokio::test]
    async fn stale_version_is_rejected_not_overwritten() {
        let repo = InMemoryOrderRepository::new();
        let created = sample_order();
        repo.create(&created).await.unwrap();

        // Writer A wins.
        let mut winner = created.clone();
        winner.mark_payment_failed(Timestamp::now()).unwrap();
        repo.update_conditional(&winner, created.version).await.unwrap();

        // Writer B started from the same snapshot and must lose.
        let mut loser = created.clone();
        loser
            .transition_status(crate::domain::order::OrderStatus::Cancelled, Timestamp::now())
            .unwrap();
        let result = repo.update_conditional(&loser, created.version).await;

        assert!(matches!(result, Err(OrderRepositoryError::Conflict { .. })));
        // The winning write is untouched.
        assert_eq!(
            repo.get(&created.id).unwrap().status,
            crate::domain::order::OrderStatus::PaymentFailed
        );
    }

    #[tokio::test]
    async fn update_of_unknown_order_is_not_found() {
        let repo = InMemoryOrderRepository::new();
        let order = sample_order();
        let result = repo.update_conditional(&order, 1).await;
        assert!(matches!(result, Err(OrderRepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn find_by_user_returns_newest_first() {
        let repo = InMemoryOrderRepository::new();
        let user = UserId::new("user-1").unwrap();

        let item = CartItem::new(ProductId::new("P1").unwrap(), 1, 100).unwrap();
        let cart = Cart::new(user.clone(), vec![item]);
        let older = Order::from_cart(OrderId::new(), &cart, Timestamp::now()).unwrap();
        let newer =
            Order::from_cart(OrderId::new(), &cart, Timestamp::now().plus_secs(60)).unwrap();

        repo.create(&older).await.unwrap();
        repo.create(&newer).await.unwrap();

        let orders = repo.find_by_user(&user).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, newer.id);
    }

    #[tokio::test]
    async fn delete_removes_order() {
        let repo = InMemoryOrderRepository::new();
        let order = sample_order();
        repo.create(&order).await.unwrap();

        repo.delete(&order.id).await.unwrap();
        assert_eq!(repo.count(), 0);
        assert!(matches!(
            repo.delete(&order.id).await,
            Err(OrderRepositoryError::NotFound(_))
        ));
    }
}
