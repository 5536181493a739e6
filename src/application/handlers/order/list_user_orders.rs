//! ListUserOrdersHandler - query the authenticated user's orders.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::order::{Order, OrderError};
use crate::ports::OrderRepository;

/// Query for a user's order history.
#[derive(Debug, Clone)]
pub struct ListUserOrdersQuery {
    pub user_id: UserId,
}

/// Handler for listing a user's orders, newest first.
pub struct ListUserOrdersHandler {
    repository: Arc<dyn OrderRepository>,
}

impl ListUserOrdersHandler {
    pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ListUserOrdersQuery) -> Result<Vec<Order>, OrderError> {
        Ok(self.repository.find_by_user(&query.user_id).await?)
    }
}
