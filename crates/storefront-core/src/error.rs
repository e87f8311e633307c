//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - Domain error taxonomy                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  storefront-db errors (separate crate)                                 │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ← DbError (at the service seam)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant is recoverable at the boundary. Infrastructure failures
//! surface as [`CoreError::Database`], distinct from the domain variants, so
//! callers can tell "your request was wrong" from "we failed".

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain errors for the order & inventory engine.
///
/// These errors represent business rule violations or missing entities.
/// They should be caught and translated to user-facing messages at the
/// transport boundary.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The referenced entity id does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Malformed or missing required input (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The operation is not permitted given the entity's current state.
    ///
    /// ## When This Occurs
    /// - Removing a discount from a product that is not discounted
    /// - Cancelling an order that is already Completed or Cancelled
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The supplied order status is not a recognized state.
    ///
    /// Unknown values are rejected, never silently coerced.
    #[error("unrecognized order status: {status}")]
    InvalidTransition { status: String },

    /// A stock decrement asked for more units than are on hand.
    ///
    /// The stored quantity is left untouched when this is returned.
    #[error("insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Unexpected infrastructure failure (store unavailable, corrupt row).
    #[error("storage error: {0}")]
    Database(String),
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates an InvalidState error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        CoreError::InvalidState(message.into())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements, before any
/// business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// The referenced user does not resolve in the user directory.
    #[error("user does not exist: {id}")]
    UnknownUser { id: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_id: "p-1".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "insufficient stock for product p-1: available 3, requested 5"
        );

        let err = CoreError::not_found("Product", "p-404");
        assert_eq!(err.to_string(), "Product not found: p-404");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "order items".to_string(),
        };
        assert_eq!(err.to_string(), "order items is required");

        let err = ValidationError::UnknownUser {
            id: "u-9".to_string(),
        };
        assert_eq!(err.to_string(), "user does not exist: u-9");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
