//! GetOrderHandler - query a single order by id.

use std::sync::Arc;

use crate::domain::foundation::OrderId;
use crate::domain::order::{Order, OrderError};
use crate::ports::OrderRepository;

/// Query for one order.
#[derive(Debug, Clone)]
pub struct GetOrderQuery {
    pub order_id: OrderId,
}

/// Handler for fetching a single order.
pub struct GetOrderHandler {
    repository: Arc<dyn OrderRepository>,
}

impl GetOrderHandler {
    pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetOrderQuery) -> Result<Order, OrderError> {
        self.repository
            .find_by_id(&query.order_id)
            .await?
            .ok_or(OrderError::NotFound(query.order_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::repository::InMemoryOrderRepository;
    use crate::domain::cart::{Cart, CartItem};
    use crate::domain::foundation::{ProductId, Timestamp, UserId};
    use crate::ports::OrderRepository as _;

    fn sample_order() -> Order {
        let item = CartItem::new(ProductId::new("P1").unwrap(), 1, 500).unwrap();
        let cart = Cart::new(UserId::new("user-1").unwrap(), vec![item]);
        Order::from_cart(OrderId::new(), &cart, Timestamp::now()).unwrap()
    }

    #[tokio::test]
    async fn returns_stored_order() {
        let repo = Arc::new(InMemoryOrderRepository::new());
        let order = sample_order();
        repo.create(&order).await.unwrap();

        let handler = GetOrderHandler::new(repo);
        let found = handler
            .handle(GetOrderQuery { order_id: order.id })
            .await
            .unwrap();

        assert_eq!(found, order);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let handler = GetOrderHandler::new(Arc::new(InMemoryOrderRepository::new()));
        let result = handler
            .handle(GetOrderQuery {
                order_id: OrderId::new(),
            })
            .await;

        assert!(matches!(result, Err(OrderError::NotFound(_))));
    }
}
