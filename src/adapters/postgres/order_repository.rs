//! PostgreSQL implementation of OrderRepository.
//!
//! Items, pricing, and payment are stored as JSONB snapshots; the version
//! check-and-set happens in a single `UPDATE ... WHERE id = $1 AND
//! version = $2`, so the guard is atomic at the storage layer and no
//! in-process lock is needed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{OrderId, Timestamp, UserId};
use crate::domain::order::{Order, OrderItem, OrderNumber, OrderStatus, PaymentRecord, Pricing};
use crate::ports::{OrderRepository, OrderRepositoryError};

/// PostgreSQL implementation of the OrderRepository port.
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    /// Creates a repository over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an order.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    order_number: String,
    user_id: String,
    items: JsonValue,
    pricing: JsonValue,
    status: String,
    payment: Option<JsonValue>,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = OrderRepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status: OrderStatus = row
            .status
            .parse()
            .map_err(|e| storage_error("invalid status value", e))?;
        let items: Vec<OrderItem> = serde_json::from_value(row.items)
            .map_err(|e| storage_error("invalid items payload", e))?;
        let pricing: Pricing = serde_json::from_value(row.pricing)
            .map_err(|e| storage_error("invalid pricing payload", e))?;
        let payment: Option<PaymentRecord> = row
            .payment
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| storage_error("invalid payment payload", e))?;

        Ok(Order {
            id: OrderId::from_uuid(row.id),
            order_number: OrderNumber::new(row.order_number)
                .map_err(|e| storage_error("invalid order number", e))?,
            user_id: UserId::new(row.user_id)
                .map_err(|e| storage_error("invalid user id", e))?,
            items,
            pricing,
            status,
            payment,
            version: row.version,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn storage_error(context: &str, err: impl std::fmt::Display) -> OrderRepositoryError {
    OrderRepositoryError::Storage(format!("{}: {}", context, err))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<JsonValue, OrderRepositoryError> {
    serde_json::to_value(value).map_err(|e| storage_error("serialization failed", e))
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn create(&self, order: &Order) -> Result<(), OrderRepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number, user_id, items, pricing, status, payment,
                version, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.order_number.as_str())
        .bind(order.user_id.as_str())
        .bind(to_json(&order.items)?)
        .bind(to_json(&order.pricing)?)
        .bind(order.status.as_str())
        .bind(order.payment.as_ref().map(to_json).transpose()?)
        .bind(order.version)
        .bind(order.created_at.as_datetime())
        .bind(order.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("insert failed", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, order_number, user_id, items, pricing, status, payment,
                   version, created_at, updated_at
            FROM orders WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("select failed", e))?;

        row.map(Order::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Order>, OrderRepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, order_number, user_id, items, pricing, status, payment,
                   version, created_at, updated_at
            FROM orders WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage_error("select failed", e))?;

        rows.into_iter().map(Order::try_from).collect()
    }

    async fn update_conditional(
        &self,
        order: &Order,
        expected_version: i64,
    ) -> Result<(), OrderRepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET pricing = $3, status = $4, payment = $5, version = $6, updated_at = $7
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(expected_version)
        .bind(to_json(&order.pricing)?)
        .bind(order.status.as_str())
        .bind(order.payment.as_ref().map(to_json).transpose()?)
        .bind(order.version)
        .bind(order.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error("update failed", e))?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // Distinguish a lost version race from a missing row.
        let exists: Option<(i64,)> = sqlx::query_as("SELECT version FROM orders WHERE id = $1")
            .bind(order.id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("select failed", e))?;

        match exists {
            Some(_) => Err(OrderRepositoryError::Conflict {
                order_id: order.id,
                expected_version,
            }),
            None => Err(OrderRepositoryError::NotFound(order.id)),
        }
    }

    async fn delete(&self, id: &OrderId) -> Result<(), OrderRepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("delete failed", e))?;

        if result.rows_affected() == 0 {
            return Err(OrderRepositoryError::NotFound(*id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_row() -> OrderRow {
        OrderRow {
            id: Uuid::new_v4(),
            order_number: "ORD-20260806-ABCDEF123456".to_string(),
            user_id: "user-1".to_string(),
            items: json!([{
                "product_id": "P1",
                "name": "Widget",
                "price": 1000,
                "image": null,
                "quantity": 2,
                "subtotal": 2000
            }]),
            pricing: json!({
                "subtotal": 2000,
                "tax": 0,
                "discount": 0,
                "shipping_fee": 0,
                "total": 2000
            }),
            status: "PAID".to_string(),
            payment: Some(json!({
                "method": "card",
                "transaction_id": "txn-1",
                "paid_at": "2026-08-06T12:00:00Z",
                "amount": 2000
            })),
            version: 2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn row_maps_to_aggregate() {
        let row = sample_row();
        let id = row.id;
        let order = Order::try_from(row).unwrap();

        assert_eq!(order.id.as_uuid(), &id);
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.pricing.total, 2000);
        assert_eq!(order.payment.as_ref().unwrap().amount, 2000);
        assert_eq!(order.version, 2);
    }

    #[test]
    fn unknown_status_is_a_storage_error() {
        let mut row = sample_row();
        row.status = "LOST".to_string();
        assert!(matches!(
            Order::try_from(row),
            Err(OrderRepositoryError::Storage(_))
        ));
    }

    #[test]
    fn malformed_items_payload_is_a_storage_error() {
        let mut row = sample_row();
        row.items = json!({"not": "a list"});
        assert!(matches!(
            Order::try_from(row),
            Err(OrderRepositoryError::Storage(_))
        ));
    }

    #[test]
    fn aggregate_json_round_trips_through_row_payloads() {
        use crate::domain::cart::{Cart, CartItem};
        use crate::domain::foundation::ProductId;

        let item = CartItem::new(ProductId::new("P1").unwrap(), 2, 1000).unwrap();
        let cart = Cart::new(UserId::new("user-1").unwrap(), vec![item]);
        let order = Order::from_cart(OrderId::new(), &cart, Timestamp::now()).unwrap();

        let row = OrderRow {
            id: *order.id.as_uuid(),
            order_number: order.order_number.as_str().to_string(),
            user_id: order.user_id.as_str().to_string(),
            items: to_json(&order.items).unwrap(),
            pricing: to_json(&order.pricing).unwrap(),
            status: order.status.as_str().to_string(),
            payment: None,
            version: order.version,
            created_at: *order.created_at.as_datetime(),
            updated_at: *order.updated_at.as_datetime(),
        };

        let back = Order::try_from(row).unwrap();
        assert_eq!(back, order);
    }
}
