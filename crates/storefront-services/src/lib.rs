//! # storefront-services: Engine Components
//!
//! The order & inventory consistency engine, composed over the repository
//! layer. These services are the inbound boundary: a REST controller or a
//! GraphQL resolver layer (both out of scope) maps onto the same calls and
//! the same error kinds.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  client ──► OrderService.place_order ──► validate, persist, price      │
//! │                     │                                                   │
//! │                     └──► OrderNotifier.publish (fire-and-forget)       │
//! │                                                                         │
//! │  client ──► PricingService.apply/remove_discount ──► product rows      │
//! │                                                                         │
//! │  client ──► StockService.real_time_stock ──► product row + order       │
//! │                                              history (derived view)    │
//! │                                                                         │
//! │  client ──► ReportService.daily/monthly ──► cache? ──► order history   │
//! │                              (10-minute TTL, lazy eviction)            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every service holds a cheap clone of the [`storefront_db::Database`]
//! handle; no service keeps mutable state of its own except the report
//! cache and the notifier hub.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog_service;
pub mod notification_service;
pub mod order_service;
pub mod pricing_service;
pub mod report_cache;
pub mod report_service;
pub mod stock_service;

#[cfg(test)]
pub(crate) mod testutil;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog_service::CatalogService;
pub use notification_service::{OrderNotifier, OrderPlacedEvent};
pub use order_service::OrderService;
pub use pricing_service::PricingService;
pub use report_cache::{ReportCache, ReportKey};
pub use report_service::ReportService;
pub use stock_service::StockService;
