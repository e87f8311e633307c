//! # Repository Module
//!
//! Database repository implementations for the storefront engine.
//!
//! ## Repository Pattern
//! Each repository owns the SQL for one aggregate and exposes a typed async
//! API over the shared pool:
//!
//! - [`product::ProductRepository`] - Product rows: CRUD, search, discount
//!   and stock mutations
//! - [`order::OrderRepository`] - Orders and their items
//! - [`report::ReportRepository`] - Completed-order line reads for the
//!   reporting aggregator
//! - [`user::UserRepository`] - The user directory
//! - [`catalog::CatalogRepository`] - Attribute lookup tables
//!
//! Mutations that must be atomic (discount apply, stock decrement, order
//! insert with items, delete with items) run inside a single transaction or
//! a single conditional UPDATE, so concurrent calls on the same row cannot
//! interleave into lost updates and a dropped future leaves no partial
//! write.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{DbError, DbResult};

pub mod catalog;
pub mod order;
pub mod product;
pub mod report;
pub mod user;

/// Generates a new entity id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Parses a decimal TEXT column, surfacing corrupt values as a decode error
/// rather than a panic.
pub(crate) fn parse_decimal(column: &str, value: &str) -> DbResult<Decimal> {
    value.parse::<Decimal>().map_err(|e| DbError::Decode {
        column: column.to_string(),
        message: format!("'{value}': {e}"),
    })
}
