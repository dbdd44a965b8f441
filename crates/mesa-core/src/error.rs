//! # Error Types
//!
//! Domain-specific error types for mesa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mesa-core errors (this file)                                          │
//! │  ├── CoreError        - Cart and domain logic failures                 │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  mesa-db errors (separate crate)                                       │
//! │  └── StoreError       - Storage failures, integrity refusals           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → UI collaborator      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, index, id)
//! 3. Errors are enum variants, never String
//! 4. Validation errors are raised before any write is attempted

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when a value does not meet the shape the domain requires.
/// They are raised before any business logic or I/O runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// A price that must not be negative is negative.
    #[error("{field} must not be negative")]
    NegativePrice { field: String },

    /// Product base price plus variant adjustment would drop below zero.
    /// Products and variants must never be combined into a negative unit
    /// price; this is rejected at validation, never silently clamped.
    #[error("unit price would be negative ({cents} cents)")]
    NegativeUnitPrice { cents: i64 },

    /// A modifier carries both a product and a variant reference.
    /// The scope invariant allows at most one.
    #[error("modifier has both product and variant scope references")]
    ConflictingScope,

    /// A modifier scoped to one product/variant was selected for a line
    /// built for a different one.
    #[error("modifier {modifier} is not applicable to this line: {reason}")]
    ScopeMismatch { modifier: String, reason: String },

    /// A variant was supplied that does not belong to the line's product.
    #[error("variant {variant_id} does not belong to product {product_id}")]
    VariantMismatch { variant_id: i64, product_id: i64 },

    /// An entity that must be persisted (carry an id) is unsaved.
    #[error("{entity} has no id; save it before using it here")]
    Unsaved { entity: &'static str },
}

// =============================================================================
// Core Error
// =============================================================================

/// Cart and domain logic errors.
///
/// These represent business rule violations. The UI shows the error kind's
/// message and leaves the current form or cart state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The requested cart line index does not exist.
    #[error("cart line {index} not found")]
    LineNotFound { index: usize },

    /// Checkout was attempted with no lines in the cart.
    #[error("cannot check out an empty order")]
    EmptyCart,

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

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
        let err = ValidationError::Required {
            field: "name_primary".to_string(),
        };
        assert_eq!(err.to_string(), "name_primary is required");

        let err = ValidationError::VariantMismatch {
            variant_id: 4,
            product_id: 9,
        };
        assert_eq!(
            err.to_string(),
            "variant 4 does not belong to product 9"
        );
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
