//! # Report Repository
//!
//! Completed-order line reads for the reporting aggregator.
//!
//! The repository only FETCHES; summing happens in the service layer so
//! earnings stay in `Decimal` end to end. Letting SQLite SUM the TEXT
//! price column would coerce through binary floating point.
//!
//! Window comparisons bind `DateTime<Utc>` values, which sqlx encodes as
//! RFC3339 UTC TEXT - the same fixed-width format the rows were written
//! with, so lexicographic comparison is chronological.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::parse_decimal;
use storefront_core::OrderStatus;

/// One line item of a completed order, joined with its product name.
#[derive(Debug, Clone)]
pub struct CompletedLine {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
}

#[derive(Debug, sqlx::FromRow)]
struct CompletedLineRow {
    product_id: String,
    product_name: String,
    quantity: i64,
    unit_price: String,
}

impl CompletedLineRow {
    fn into_line(self) -> DbResult<CompletedLine> {
        let unit_price = parse_decimal("order_items.unit_price", &self.unit_price)?;

        Ok(CompletedLine {
            product_id: self.product_id,
            product_name: self.product_name,
            quantity: self.quantity,
            unit_price,
        })
    }
}

const LINE_QUERY: &str = "SELECT oi.product_id, p.name AS product_name, oi.quantity, oi.unit_price \
     FROM order_items oi \
     INNER JOIN orders o ON o.id = oi.order_id \
     INNER JOIN products p ON p.id = oi.product_id \
     WHERE o.status = ?1";

/// Repository for report source reads.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Fetches completed-order lines whose order date falls in
    /// `[start, end)` (UTC).
    pub async fn completed_lines_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<CompletedLine>> {
        let sql = format!("{LINE_QUERY} AND o.order_date >= ?2 AND o.order_date < ?3");

        let rows: Vec<CompletedLineRow> = sqlx::query_as(&sql)
            .bind(OrderStatus::Completed)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), %start, %end, "Fetched completed lines for window");

        rows.into_iter().map(CompletedLineRow::into_line).collect()
    }

    /// Fetches all completed-order lines across all time.
    pub async fn completed_lines(&self) -> DbResult<Vec<CompletedLine>> {
        let rows: Vec<CompletedLineRow> = sqlx::query_as(LINE_QUERY)
            .bind(OrderStatus::Completed)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Fetched all completed lines");

        rows.into_iter().map(CompletedLineRow::into_line).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
