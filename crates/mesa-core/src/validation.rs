//! # Validation Module
//!
//! Input validation utilities for Mesa POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI collaborator                                              │
//! │  ├── Basic format checks (empty fields, non-numeric price)             │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                       │
//! │  ├── Required bilingual name pairs                                     │
//! │  ├── Non-negative prices, positive quantities                          │
//! │  └── Modifier scope invariant                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  └── Foreign key cascade/restrict rules                                │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Modifier, Product, Variant};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of a display name (either language).
pub const MAX_NAME_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates one half of a bilingual name pair.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most [`MAX_NAME_LEN`] characters
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a bilingual name pair. Both halves are required.
pub fn validate_name_pair(primary: &str, secondary: &str) -> ValidationResult<()> {
    validate_name("name_primary", primary)?;
    validate_name("name_secondary", secondary)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line or modifier quantity.
///
/// ## Rules
/// - Must be positive (> 0). Zero-quantity modifier selections are removed
///   from the line by the cart, never stored.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a base price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
pub fn validate_base_price(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::NegativePrice {
            field: "base_price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Composition Validators
// =============================================================================

/// Computes and validates the unit price of a product/variant pairing.
///
/// ## Contract
/// `unit_price = base_price + adjustment`. A negative adjustment may validly
/// bring the unit price to zero but never below; a pairing that would go
/// negative is rejected here rather than clamped.
pub fn validate_unit_price(product: &Product, variant: Option<&Variant>) -> ValidationResult<Money> {
    let unit_price = product.base_price()
        + variant.map(Variant::adjustment).unwrap_or_else(Money::zero);

    if unit_price.is_negative() {
        return Err(ValidationError::NegativeUnitPrice {
            cents: unit_price.cents(),
        });
    }

    Ok(unit_price)
}

/// Validates a modifier's shape: required name pair and the at-most-one
/// scope reference invariant.
pub fn validate_modifier(modifier: &Modifier) -> ValidationResult<()> {
    validate_name_pair(&modifier.name_primary, &modifier.name_secondary)?;
    modifier.scope()?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_pair() {
        assert!(validate_name_pair("Bebidas", "Drinks").is_ok());
        assert!(validate_name_pair("", "Drinks").is_err());
        assert!(validate_name_pair("Bebidas", "   ").is_err());
        assert!(validate_name_pair("Bebidas", &"x".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-2).is_err());
    }

    #[test]
    fn test_validate_base_price() {
        assert!(validate_base_price(0).is_ok()); // free item
        assert!(validate_base_price(1099).is_ok());
        assert!(validate_base_price(-1).is_err());
    }

    #[test]
    fn test_unit_price_never_negative() {
        let product = Product::new("Café", "Coffee", Money::from_cents(200));

        let mut to_zero = Variant::new(1, "Mini", "Mini");
        to_zero.adjustment_cents = -200;
        // Valid: adjustment brings the unit price exactly to zero.
        assert_eq!(
            validate_unit_price(&product, Some(&to_zero)).unwrap(),
            Money::zero()
        );

        let mut below_zero = Variant::new(1, "Imposible", "Impossible");
        below_zero.adjustment_cents = -300;
        assert!(matches!(
            validate_unit_price(&product, Some(&below_zero)),
            Err(ValidationError::NegativeUnitPrice { cents: -100 })
        ));
    }

    #[test]
    fn test_validate_modifier_scope_invariant() {
        let ok = Modifier::new("Queso", "Cheese", Money::from_cents(150)).for_product(1);
        assert!(validate_modifier(&ok).is_ok());

        let bad = Modifier::new("Raro", "Odd", Money::zero())
            .for_product(1)
            .for_variant(2);
        assert!(validate_modifier(&bad).is_err());
    }
}
