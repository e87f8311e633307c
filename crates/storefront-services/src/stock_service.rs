//! # Stock Service
//!
//! The stock reconciler. Two notions of stock coexist by design:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stored counter (products.quantity)     derived view (order history)   │
//! │  ─────────────────────────────────      ─────────────────────────────  │
//! │  authoritative, slow-changing           audit-grade, recomputable      │
//! │  mutated by decrement_stock at          sold = Σ item qty over          │
//! │  fulfillment time                       COMPLETED orders only          │
//! │                                                                         │
//! │  They are NOT required to match: a Shipped order has conceptually      │
//! │  consumed physical stock but is not Completed, so the derived view     │
//! │  does not count it yet. Do not "fix" this by reconciling the paths -   │
//! │  whether Shipped should reduce available-to-sell stock is an open      │
//! │  product question, recorded in DESIGN.md.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::info;

use storefront_core::error::ValidationError;
use storefront_core::{CoreError, CoreResult, StockLevel};
use storefront_db::Database;

/// Derived stock reads and authoritative decrements.
#[derive(Debug, Clone)]
pub struct StockService {
    db: Database,
}

impl StockService {
    /// Creates the service over a database handle.
    pub fn new(db: Database) -> Self {
        StockService { db }
    }

    /// Computes the derived stock view for a product.
    ///
    /// Read-only: `sold` sums item quantities across COMPLETED orders,
    /// `current = initial − sold` where `initial` is the stored counter.
    /// The stored `quantity` field is never mutated here.
    ///
    /// ## Errors
    /// * [`CoreError::NotFound`] - unknown product
    pub async fn real_time_stock(&self, product_id: &str) -> CoreResult<StockLevel> {
        let product = self
            .db
            .products()
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Product", product_id))?;

        let sold = self
            .db
            .orders()
            .completed_quantity_for_product(product_id)
            .await?;

        Ok(StockLevel {
            product_id: product.id,
            name: product.name,
            initial_quantity: product.quantity,
            sold_quantity: sold,
            current_quantity: product.quantity - sold,
        })
    }

    /// Decrements the stored on-hand counter at fulfillment time.
    ///
    /// The availability check and the decrement are one atomic statement;
    /// an insufficient balance leaves the stored quantity untouched.
    ///
    /// ## Errors
    /// * [`CoreError::Validation`] - `amount_sold` is not positive
    /// * [`CoreError::NotFound`] - unknown product
    /// * [`CoreError::InsufficientStock`] - `amount_sold` exceeds the
    ///   stored quantity
    pub async fn decrement_stock(&self, product_id: &str, amount_sold: i64) -> CoreResult<StockLevel> {
        if amount_sold <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "amount sold".to_string(),
            }
            .into());
        }

        let decremented = self
            .db
            .products()
            .decrement_quantity(product_id, amount_sold)
            .await?;

        if !decremented {
            // Nothing matched: missing row or not enough on hand.
            return match self.db.products().get_by_id(product_id).await? {
                None => Err(CoreError::not_found("Product", product_id)),
                Some(product) => Err(CoreError::InsufficientStock {
                    product_id: product_id.to_string(),
                    available: product.quantity,
                    requested: amount_sold,
                }),
            };
        }

        let product = self
            .db
            .products()
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Product", product_id))?;

        info!(
            product_id = %product_id,
            amount_sold,
            remaining = product.quantity,
            "Stock decremented"
        );

        Ok(StockLevel {
            product_id: product.id,
            name: product.name,
            initial_quantity: product.quantity + amount_sold,
            sold_quantity: amount_sold,
            current_quantity: product.quantity,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
