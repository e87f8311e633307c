//! # Domain Types
//!
//! Core domain types for the order & inventory consistency engine.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Order       │   │   OrderItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  price          │   │  status         │   │  quantity       │       │
//! │  │  original_price │   │  order_date     │   │  unit_price     │       │
//! │  │  quantity       │   │  user_id (FK)   │   │  (snapshot)     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │     Report      │   │   StockLevel    │   (ephemeral, computed      │
//! │  │  earnings/best  │   │  derived stock  │    on demand, never rows    │
//! │  └─────────────────┘   └─────────────────┘    of truth)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Price Snapshot Invariants
//! - `Product.original_price` is the pre-discount snapshot; when
//!   `is_discounted` is false it equals `price` and `discount_percentage`
//!   is `None`.
//! - `OrderItem.unit_price` is frozen at placement time and never tracks
//!   later catalog price changes, so historical reports stay stable.
//! - An order's total price is always derived from its items, never stored.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;
use crate::NO_PRODUCT_NAME;

// =============================================================================
// Order Status
// =============================================================================

/// The lifecycle status of an order.
///
/// `Pending → Processing → Shipped → Delivered → Completed`, with
/// `Cancelled` reachable from any non-terminal state. `Completed` and
/// `Cancelled` are terminal. Only `Completed` orders count toward derived
/// stock and earnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order has been placed but not yet picked up for processing.
    Pending,
    /// Order is being prepared.
    Processing,
    /// Order has left the warehouse.
    Shipped,
    /// Order has reached the customer.
    Delivered,
    /// Order was cancelled before completion. Terminal.
    Cancelled,
    /// Order is fully realized. Terminal. Counts toward derived stock
    /// and earnings.
    Completed,
}

impl OrderStatus {
    /// All recognized statuses, in declaration order.
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::Completed,
    ];

    /// Parses a status name, case-insensitively.
    ///
    /// Unknown values fail with [`CoreError::InvalidTransition`] - callers
    /// must never silently coerce an unrecognized status.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::OrderStatus;
    ///
    /// assert_eq!(OrderStatus::parse("shipped").unwrap(), OrderStatus::Shipped);
    /// assert_eq!(OrderStatus::parse("Completed").unwrap(), OrderStatus::Completed);
    /// assert!(OrderStatus::parse("refunded").is_err());
    /// ```
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            "completed" => Ok(OrderStatus::Completed),
            _ => Err(CoreError::InvalidTransition {
                status: value.to_string(),
            }),
        }
    }

    /// The lowercase wire/storage name of this status.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Completed => "completed",
        }
    }

    /// Whether this status admits no further transitions.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Optional description.
    pub description: Option<String>,

    /// Current effective price. Equals `original_price` unless a discount
    /// is applied.
    pub price: Decimal,

    /// Pre-discount snapshot of the price, preserved so discounts are
    /// reversible without drift.
    pub original_price: Decimal,

    /// Whether a discount is currently applied.
    pub is_discounted: bool,

    /// Discount percentage (0-100) when discounted, `None` otherwise.
    pub discount_percentage: Option<Decimal>,

    /// Nominal on-hand quantity as last written. The authoritative,
    /// slow-changing stock counter; see [`StockLevel`] for the derived view.
    pub quantity: i64,

    /// Category reference.
    pub category_id: String,
    /// Brand reference.
    pub brand_id: String,
    /// Gender reference.
    pub gender_id: String,
    /// Color reference.
    pub color_id: String,
    /// Size reference.
    pub size_id: String,

    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether the stored on-hand counter is above zero.
    #[inline]
    pub const fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

// =============================================================================
// Catalog Attributes
// =============================================================================

/// A catalog attribute row (Category, Brand, Gender, Color, Size).
///
/// All five attribute tables share this shape: a generated id and a
/// name that is unique within the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Attribute {
    pub id: String,
    pub name: String,
}

// =============================================================================
// User
// =============================================================================

/// A row from the user directory.
///
/// The engine only resolves users when placing orders; identity and
/// authentication live outside this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Order
// =============================================================================

/// A persisted order.
///
/// The total price is NOT a field here - it is always derived from the
/// order's items via [`order_total`], never stored-and-stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub status: OrderStatus,
    /// Placement timestamp (UTC). Report windows are computed against this.
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line item on an order.
///
/// Uses the snapshot pattern: `unit_price` freezes the price at placement
/// time and is immutable thereafter, regardless of later catalog changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    /// Number of units ordered. Always positive.
    pub quantity: i64,
    /// Price per unit at the time of order (frozen).
    pub unit_price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// A requested order line, as submitted by the caller.
///
/// The unit price is trusted as priced at submission time; it is not
/// re-derived from the current catalog price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price: Decimal,
}

/// An order together with its items and derived total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItem>,
    /// `Σ quantity × unit_price` over `items`, computed at construction.
    pub total_price: Decimal,
}

impl OrderDetail {
    /// Builds the detail view, deriving the total from the items.
    pub fn new(order: Order, items: Vec<OrderItem>) -> Self {
        let total_price = order_total(&items);
        OrderDetail {
            order,
            items,
            total_price,
        }
    }
}

/// Derives an order's total price from its line items.
///
/// ## Example
/// ```rust
/// use storefront_core::order_total;
///
/// assert_eq!(order_total(&[]), rust_decimal::Decimal::ZERO);
/// ```
pub fn order_total(items: &[OrderItem]) -> Decimal {
    items
        .iter()
        .map(|item| Decimal::from(item.quantity) * item.unit_price)
        .sum()
}

// =============================================================================
// Report
// =============================================================================

/// An earnings report over a day, a month, or (for top sellers) all time.
///
/// Ephemeral and computed on demand from completed-order history; cached by
/// the reporting aggregator with a short TTL, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub report_date: NaiveDate,
    pub total_earnings: Decimal,
    /// `"N/A"` when no completed sales exist in the window.
    pub most_selling_product_name: String,
    pub most_selling_product_quantity: i64,
}

impl Report {
    /// The zero-earnings report for a window with no completed orders.
    pub fn empty(report_date: NaiveDate) -> Self {
        Report {
            report_date,
            total_earnings: Decimal::ZERO,
            most_selling_product_name: NO_PRODUCT_NAME.to_string(),
            most_selling_product_quantity: 0,
        }
    }
}

// =============================================================================
// Stock Level
// =============================================================================

/// A stock view for a single product.
///
/// Two different notions of stock coexist:
/// - the stored on-hand counter ([`Product::quantity`], authoritative,
///   mutated at fulfillment time), and
/// - this derived view, recomputable from completed-order history.
///
/// They are NOT required to match at all times: an order can be Shipped
/// (physically consuming stock) without being Completed and therefore not
/// yet counted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    pub product_id: String,
    pub name: String,
    pub initial_quantity: i64,
    pub sold_quantity: i64,
    pub current_quantity: i64,
}

// =============================================================================
// Catalog Requests
// =============================================================================

/// Payload for creating or updating a product.
///
/// Attribute references are resolved by NAME against the catalog lookup
/// tables; unknown names fail with NotFound.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub quantity: i64,
    pub category_name: String,
    pub brand_name: String,
    pub gender_name: String,
    pub color_name: String,
    pub size_name: String,
}

/// Conjunctive search filters over the catalog.
///
/// Every `Some` field narrows the result set; `None` fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    pub category: Option<String>,
    pub gender: Option<String>,
    pub brand: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub size: Option<String>,
    pub color: Option<String>,
    /// `Some(true)` keeps only products with stored quantity above zero,
    /// `Some(false)` only those at zero.
    pub in_stock: Option<bool>,
}

// =============================================================================
// Unit Tests
// =============================================================================
