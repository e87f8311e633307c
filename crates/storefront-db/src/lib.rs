//! # storefront-db: Database Layer for the Storefront Engine
//!
//! This crate provides database access for the order & inventory engine.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (product, order, report,
//!   user, catalog)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_db::{Database, DbConfig};
//!
//! // Create database with default config (runs migrations)
//! let config = DbConfig::new("path/to/store.db");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let product = db.products().get_by_id("some-uuid").await?;
//! ```
//!
//! ## Storage Notes
//! Prices and percentages are stored as decimal TEXT and parsed back into
//! `rust_decimal::Decimal` at the row-mapping seam. Timestamps are RFC3339
//! UTC TEXT written through sqlx's chrono integration; because the format is
//! fixed-width UTC, SQLite's lexicographic TEXT comparison orders them
//! chronologically, which the report window queries rely on.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

#[cfg(test)]
pub(crate) mod testutil;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::catalog::{AttributeRepository, CatalogRepository};
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::report::{CompletedLine, ReportRepository};
pub use repository::user::UserRepository;
