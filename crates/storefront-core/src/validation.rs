//! # Validation Module
//!
//! Input validation for the order & inventory engine.
//!
//! Validation runs at the service boundary, before any business logic or
//! I/O. The database adds a second line of defense (NOT NULL, UNIQUE and
//! foreign-key constraints), but callers should never rely on it for
//! user-facing errors.

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::types::OrderItemRequest;
use crate::{MAX_ITEM_QUANTITY, MAX_ORDER_ITEMS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a discount percentage.
///
/// ## Rules
/// - Must be between 0 and 100 inclusive
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use storefront_core::validation::validate_percentage;
///
/// assert!(validate_percentage(Decimal::from(20)).is_ok());
/// assert!(validate_percentage(Decimal::from(100)).is_ok());
/// assert!(validate_percentage(Decimal::from(101)).is_err());
/// assert!(validate_percentage(Decimal::from(-1)).is_err());
/// ```
pub fn validate_percentage(percentage: Decimal) -> ValidationResult<()> {
    if percentage < Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: "discount percentage".to_string(),
            min: "0".to_string(),
            max: "100".to_string(),
        });
    }

    Ok(())
}

/// Validates a line-item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: "1".to_string(),
            max: MAX_ITEM_QUANTITY.to_string(),
        });
    }

    Ok(())
}

/// Validates a price or unit price.
///
/// ## Rules
/// - Must be non-negative (zero is allowed: free items)
pub fn validate_price(price: Decimal) -> ValidationResult<()> {
    if price < Decimal::ZERO {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a calendar month number.
pub fn validate_month(month: u32) -> ValidationResult<()> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::OutOfRange {
            field: "month".to_string(),
            min: "1".to_string(),
            max: "12".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates a submitted order's line items.
///
/// ## Rules
/// - The collection must not be empty
/// - At most MAX_ORDER_ITEMS lines
/// - Every quantity positive, every unit price non-negative
pub fn validate_order_items(items: &[OrderItemRequest]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Required {
            field: "order items".to_string(),
        });
    }

    if items.len() > MAX_ORDER_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "order items".to_string(),
            min: "1".to_string(),
            max: MAX_ORDER_ITEMS.to_string(),
        });
    }

    for item in items {
        validate_quantity(item.quantity)?;
        validate_price(item.unit_price)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: i64, unit_price: Decimal) -> OrderItemRequest {
        OrderItemRequest {
            product_id: "p-1".to_string(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn test_validate_percentage() {
        assert!(validate_percentage(Decimal::ZERO).is_ok());
        assert!(validate_percentage(Decimal::new(125, 1)).is_ok()); // 12.5
        assert!(validate_percentage(Decimal::ONE_HUNDRED).is_ok());

        assert!(validate_percentage(Decimal::from(-1)).is_err());
        assert!(validate_percentage(Decimal::new(10001, 2)).is_err()); // 100.01
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-5).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert!(validate_price(Decimal::new(1099, 2)).is_ok());
        assert!(validate_price(Decimal::new(-1, 2)).is_err());
    }

    #[test]
    fn test_validate_month() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert!(validate_month(0).is_err());
        assert!(validate_month(13).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Trail Runner 2").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"x".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_order_items() {
        assert!(validate_order_items(&[line(2, Decimal::new(999, 2))]).is_ok());

        // Empty order
        assert!(validate_order_items(&[]).is_err());

        // Bad line quantities / prices
        assert!(validate_order_items(&[line(0, Decimal::ONE)]).is_err());
        assert!(validate_order_items(&[line(1, Decimal::from(-2))]).is_err());
    }
}
