//! # Order Repository
//!
//! Database operations for orders and their line items.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. PLACE                                                               │
//! │     └── insert(user, items) → Order { status: Pending } + items        │
//! │         (one transaction: order row and every item, or nothing)        │
//! │                                                                         │
//! │  2. PROGRESS                                                            │
//! │     └── update_status() → Processing / Shipped / Delivered / ...       │
//! │                                                                         │
//! │  3. TERMINAL                                                            │
//! │     └── Completed (counts toward derived stock and earnings)           │
//! │     └── Cancelled                                                       │
//! │                                                                         │
//! │  4. (OPTIONAL) DELETE                                                   │
//! │     └── delete() → hard delete, items cascade. No audit trail.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unit prices are snapshots supplied at placement time; nothing in this
//! repository ever rewrites an item row.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{new_id, parse_decimal};
use storefront_core::{Order, OrderItem, OrderItemRequest, OrderStatus};

const ORDER_COLUMNS: &str = "id, user_id, status, order_date, created_at, updated_at";

/// Raw order item row; unit_price stays TEXT until parsed.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: String,
    order_id: String,
    product_id: String,
    quantity: i64,
    unit_price: String,
    created_at: DateTime<Utc>,
}

impl OrderItemRow {
    fn into_item(self) -> DbResult<OrderItem> {
        let unit_price = parse_decimal("order_items.unit_price", &self.unit_price)?;

        Ok(OrderItem {
            id: self.id,
            order_id: self.order_id,
            product_id: self.product_id,
            quantity: self.quantity,
            unit_price,
            created_at: self.created_at,
        })
    }
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Persists a new order with its items in one transaction.
    ///
    /// The order starts `Pending` with `order_date = now` (UTC). Each item's
    /// unit price is stored exactly as submitted - the snapshot is the
    /// caller's.
    ///
    /// ## Returns
    /// The created order and its persisted items.
    pub async fn insert(
        &self,
        user_id: &str,
        items: &[OrderItemRequest],
    ) -> DbResult<(Order, Vec<OrderItem>)> {
        let now = Utc::now();
        let order = Order {
            id: new_id(),
            user_id: user_id.to_string(),
            status: OrderStatus::Pending,
            order_date: now,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %order.id, user_id = %user_id, items = items.len(), "Inserting order");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO orders (id, user_id, status, order_date, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(order.status)
        .bind(order.order_date)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&mut *tx)
        .await?;

        let mut persisted = Vec::with_capacity(items.len());
        for item in items {
            let row = OrderItem {
                id: new_id(),
                order_id: order.id.clone(),
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                created_at: now,
            };

            sqlx::query(
                "INSERT INTO order_items (id, order_id, product_id, quantity, unit_price, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(&row.id)
            .bind(&row.order_id)
            .bind(&row.product_id)
            .bind(row.quantity)
            .bind(row.unit_price.to_string())
            .bind(row.created_at)
            .execute(&mut *tx)
            .await?;

            persisted.push(row);
        }

        tx.commit().await?;

        Ok((order, persisted))
    }

    /// Gets an order by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1");

        let order: Option<Order> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// Gets all items for an order, in insertion order.
    pub async fn get_items(&self, order_id: &str) -> DbResult<Vec<OrderItem>> {
        let rows: Vec<OrderItemRow> = sqlx::query_as(
            "SELECT id, order_id, product_id, quantity, unit_price, created_at \
             FROM order_items WHERE order_id = ?1 ORDER BY created_at, id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderItemRow::into_item).collect()
    }

    /// Lists all orders, oldest first.
    pub async fn list_all(&self) -> DbResult<Vec<Order>> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY order_date, id");

        let orders: Vec<Order> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        Ok(orders)
    }

    /// Lists a user's orders, oldest first. Empty when the user has none.
    pub async fn list_by_user(&self, user_id: &str) -> DbResult<Vec<Order>> {
        let sql =
            format!("SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ?1 ORDER BY order_date, id");

        let orders: Vec<Order> = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Sets an order's status.
    ///
    /// A single UPDATE, so concurrent status writes on the same order
    /// serialize at the row.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Order doesn't exist
    pub async fn update_status(&self, order_id: &str, status: OrderStatus) -> DbResult<()> {
        debug!(id = %order_id, status = %status, "Updating order status");

        let result = sqlx::query("UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(order_id)
            .bind(status)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }

        Ok(())
    }

    /// Hard-deletes an order; its items go with it (FK cascade).
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Order doesn't exist
    pub async fn delete(&self, order_id: &str) -> DbResult<()> {
        debug!(id = %order_id, "Deleting order");

        let result = sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(order_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", order_id));
        }

        Ok(())
    }

    /// Sums item quantities for a product across COMPLETED orders only.
    ///
    /// This feeds the derived stock view; Pending/Processing/Shipped/
    /// Delivered/Cancelled orders never count.
    pub async fn completed_quantity_for_product(&self, product_id: &str) -> DbResult<i64> {
        let sold: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(oi.quantity), 0) \
             FROM order_items oi \
             INNER JOIN orders o ON o.id = oi.order_id \
             WHERE oi.product_id = ?1 AND o.status = ?2",
        )
        .bind(product_id)
        .bind(OrderStatus::Completed)
        .fetch_one(&self.pool)
        .await?;

        Ok(sold)
    }

    /// Counts order items for an order (diagnostics and cascade checks).
    pub async fn count_items(&self, order_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE order_id = ?1")
                .bind(order_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
