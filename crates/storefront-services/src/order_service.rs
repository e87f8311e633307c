//! # Order Service
//!
//! The order lifecycle manager: validates and persists orders, enforces the
//! status state machine, derives totals, and triggers the order-placed
//! notification.
//!
//! ## State Machine
//! ```text
//! Pending → Processing → Shipped → Delivered → Completed
//!     \___________\__________\__________\
//!                                        ▼
//!                                    Cancelled
//!
//! Completed and Cancelled are terminal.
//! ```

use tracing::{info, warn};

use storefront_core::error::ValidationError;
use storefront_core::validation::validate_order_items;
use storefront_core::{CoreError, CoreResult, Order, OrderDetail, OrderItemRequest, OrderStatus};
use storefront_db::Database;

use crate::notification_service::{OrderNotifier, OrderPlacedEvent};

/// Order lifecycle operations.
#[derive(Debug, Clone)]
pub struct OrderService {
    db: Database,
    notifier: OrderNotifier,
}

impl OrderService {
    /// Creates the service over a database handle and a notifier hub.
    pub fn new(db: Database, notifier: OrderNotifier) -> Self {
        OrderService { db, notifier }
    }

    /// The notifier this service publishes to (for wiring subscribers).
    pub fn notifier(&self) -> &OrderNotifier {
        &self.notifier
    }

    /// Places an order for a user.
    ///
    /// Items are snapshotted exactly as submitted - unit prices are trusted
    /// to have been priced at submission time and are NOT re-derived from
    /// the current catalog. The order row and every item persist in one
    /// transaction; the order starts `Pending`.
    ///
    /// On success, exactly one order-placed event is published,
    /// fire-and-forget.
    ///
    /// ## Errors
    /// * [`CoreError::Validation`] - empty items, non-positive quantity,
    ///   negative unit price, or a user id that does not resolve
    pub async fn place_order(
        &self,
        user_id: &str,
        items: Vec<OrderItemRequest>,
    ) -> CoreResult<OrderDetail> {
        validate_order_items(&items)?;

        let user = self.db.users().get_by_id(user_id).await?;
        if user.is_none() {
            return Err(ValidationError::UnknownUser {
                id: user_id.to_string(),
            }
            .into());
        }

        let (order, persisted) = self.db.orders().insert(user_id, &items).await?;
        let detail = OrderDetail::new(order, persisted);

        info!(
            order_id = %detail.order.id,
            user_id = %user_id,
            items = detail.items.len(),
            total = %detail.total_price,
            "Order placed"
        );

        self.notifier.publish_order_placed(OrderPlacedEvent::new(
            detail.order.id.clone(),
            user_id.to_string(),
            items,
        ));

        Ok(detail)
    }

    /// Sets an order's status from its wire name.
    ///
    /// Unknown names fail with [`CoreError::InvalidTransition`] - statuses
    /// are parsed, never coerced. Adjacency is deliberately NOT enforced:
    /// the source system accepts any recognized status as the next status
    /// (Pending → Completed is legal). Tightening this into a transition
    /// table would be a behavior change; the permissiveness is preserved
    /// on purpose and flagged here rather than silently "fixed".
    ///
    /// ## Errors
    /// * [`CoreError::InvalidTransition`] - unrecognized status name
    /// * [`CoreError::NotFound`] - unknown order
    pub async fn update_status(&self, order_id: &str, status: &str) -> CoreResult<Order> {
        let parsed = OrderStatus::parse(status)?;

        self.db.orders().update_status(order_id, parsed).await?;

        let order = self.require_order(order_id).await?;

        info!(order_id = %order_id, status = %parsed, "Order status updated");

        Ok(order)
    }

    /// Cancels an order that has not reached a terminal state.
    ///
    /// ## Errors
    /// * [`CoreError::NotFound`] - unknown order
    /// * [`CoreError::InvalidState`] - order already Completed or Cancelled
    pub async fn cancel_order(&self, order_id: &str) -> CoreResult<Order> {
        let order = self.require_order(order_id).await?;

        if order.status.is_terminal() {
            warn!(order_id = %order_id, status = %order.status, "Cancel rejected");
            return Err(CoreError::invalid_state(format!(
                "cannot cancel a {} order",
                order.status
            )));
        }

        self.db
            .orders()
            .update_status(order_id, OrderStatus::Cancelled)
            .await?;

        info!(order_id = %order_id, "Order cancelled");

        self.require_order(order_id).await
    }

    /// Hard-deletes an order and its items.
    ///
    /// No soft-delete, no audit trail - the rows are gone. A
    /// production-hardened deployment may want an append-only status
    /// history first; the current contract does not keep one.
    ///
    /// ## Errors
    /// * [`CoreError::NotFound`] - unknown order
    pub async fn delete_order(&self, order_id: &str) -> CoreResult<()> {
        self.db.orders().delete(order_id).await?;

        info!(order_id = %order_id, "Order deleted");

        Ok(())
    }

    /// Fetches an order with items and derived total.
    ///
    /// ## Errors
    /// * [`CoreError::NotFound`] - unknown order
    pub async fn get_order(&self, order_id: &str) -> CoreResult<OrderDetail> {
        let order = self.require_order(order_id).await?;
        let items = self.db.orders().get_items(order_id).await?;

        Ok(OrderDetail::new(order, items))
    }

    /// Lists a user's orders with items and derived totals.
    ///
    /// A user with no orders gets an empty collection, not an error.
    pub async fn orders_for_user(&self, user_id: &str) -> CoreResult<Vec<OrderDetail>> {
        let orders = self.db.orders().list_by_user(user_id).await?;
        self.with_items(orders).await
    }

    /// Lists every order with items and derived totals.
    pub async fn list_orders(&self) -> CoreResult<Vec<OrderDetail>> {
        let orders = self.db.orders().list_all().await?;
        self.with_items(orders).await
    }

    async fn with_items(&self, orders: Vec<Order>) -> CoreResult<Vec<OrderDetail>> {
        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.db.orders().get_items(&order.id).await?;
            details.push(OrderDetail::new(order, items));
        }
        Ok(details)
    }

    async fn require_order(&self, order_id: &str) -> CoreResult<Order> {
        self.db
            .orders()
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Order", order_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
