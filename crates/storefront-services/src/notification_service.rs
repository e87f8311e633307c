//! # Order Notifier
//!
//! Fire-and-forget publication of order-placed facts for asynchronous
//! subscribers (the pub/sub transport itself - GraphQL subscriptions - is
//! out of scope; this is the publish hook it attaches to).
//!
//! ## Delivery Contract
//! - Exactly one publish per successful order placement
//! - Best-effort to currently-connected subscribers only
//! - No retry, no at-least-once guarantee
//! - A failed send (no subscribers, lagging receiver) NEVER propagates to
//!   the order placement that triggered it

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::debug;

use storefront_core::OrderItemRequest;

/// Buffered events per subscriber before a lagging receiver starts losing
/// the oldest ones.
const CHANNEL_CAPACITY: usize = 64;

/// The fact published when an order is placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlacedEvent {
    pub message: String,
    pub order_id: String,
    pub user_id: String,
    pub order_items: Vec<OrderItemRequest>,
}

impl OrderPlacedEvent {
    /// Builds the event with the standard confirmation message.
    pub fn new(order_id: String, user_id: String, order_items: Vec<OrderItemRequest>) -> Self {
        OrderPlacedEvent {
            message: "Order placed successfully!".to_string(),
            order_id,
            user_id,
            order_items,
        }
    }
}

/// Broadcast hub for order-placed events.
///
/// Clones share the same channel; a subscriber sees every event published
/// after it subscribed, and none published before.
#[derive(Debug, Clone)]
pub struct OrderNotifier {
    sender: broadcast::Sender<OrderPlacedEvent>,
}

impl OrderNotifier {
    /// Creates a hub with the default subscriber buffer.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        OrderNotifier { sender }
    }

    /// Publishes an order-placed event, fire-and-forget.
    ///
    /// Send errors mean no subscriber is currently connected; the event is
    /// dropped and the caller proceeds either way.
    pub fn publish_order_placed(&self, event: OrderPlacedEvent) {
        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(receivers, "Published order-placed event");
            }
            Err(_) => {
                debug!("No subscribers connected, order-placed event dropped");
            }
        }
    }

    /// Subscribes to events published from now on.
    ///
    /// The stream yields `Err(Lagged)` items for a receiver that fell more
    /// than the channel capacity behind, then resumes with the newest
    /// events.
    pub fn subscribe(&self) -> BroadcastStream<OrderPlacedEvent> {
        BroadcastStream::new(self.sender.subscribe())
    }

    /// Number of currently-connected subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for OrderNotifier {
    fn default() -> Self {
        OrderNotifier::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
