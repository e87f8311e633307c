//! # Pricing Module
//!
//! Decimal discount arithmetic for the pricing engine.
//!
//! ## Snapshot Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Discount application always derives from the ORIGINAL price:          │
//! │                                                                         │
//! │    apply(20%)            apply(50%)           remove()                 │
//! │  19.99 ───────► 15.992 ───────────► 9.995 ───────────► 19.99          │
//! │    │                                  ▲                   ▲            │
//! │    └── original_price snapshot ───────┴───────────────────┘            │
//! │                                                                         │
//! │  Re-applying NEVER compounds on the already-discounted price, and      │
//! │  removal restores the snapshot exactly - no rounding drift.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All arithmetic is `rust_decimal::Decimal`; floating point never touches
//! a price.

use rust_decimal::Decimal;

// =============================================================================
// Discount Arithmetic
// =============================================================================

/// Computes the effective price after applying a percentage discount to the
/// original (pre-discount) price.
///
/// `price = original × (1 − percentage/100)`, evaluated as
/// `original − original × (percentage/100)`.
///
/// ## Arguments
/// * `original` - The pre-discount price snapshot
/// * `percentage` - Discount percentage in `[0, 100]` (validated upstream)
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use storefront_core::pricing::discounted_price;
///
/// let original = Decimal::new(1999, 2); // 19.99
/// let price = discounted_price(original, Decimal::from(20));
/// assert_eq!(price, Decimal::new(15992, 3)); // 15.992
/// ```
pub fn discounted_price(original: Decimal, percentage: Decimal) -> Decimal {
    original - original * (percentage / Decimal::ONE_HUNDRED)
}

// =============================================================================
// Unit Tests
// =============================================================================
