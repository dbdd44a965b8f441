//! # Pricing Engine
//!
//! Pure price composition for one order line. No side effects, no I/O.
//!
//! ## Composition Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      How a Line is Priced                               │
//! │                                                                         │
//! │  unit_price      = product.base_price + variant.adjustment (or 0)      │
//! │                                                                         │
//! │  modifiers_total = Σ modifier.price × selected quantity                 │
//! │                                                                         │
//! │  extended_total  = unit_price × line quantity + modifiers_total         │
//! │                                                                         │
//! │  Example:  base 10.00, variant +2.00, modifier 1.50 × 2, qty 3         │
//! │            unit_price      = 12.00                                      │
//! │            modifiers_total =  3.00                                      │
//! │            extended_total  = 12.00 × 3 + 3.00 = 39.00                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything is integer cents ([`Money`]); intermediate arithmetic never
//! loses precision below the 2-fraction-digit display precision.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{Modifier, Product, Variant};

// =============================================================================
// Modifier Selection
// =============================================================================

/// One modifier chosen for an order line, with its multiplier quantity.
///
/// The modifier itself is a cloned snapshot, so later catalog edits cannot
/// change what the line was priced against. A quantity multiplies the
/// modifier's price (the reference behavior; unusual for a discrete add-on
/// but confirmed).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierSelection {
    pub modifier: Modifier,
    /// Positive multiplier. Zero-quantity selections never reach a line.
    pub quantity: i64,
}

impl ModifierSelection {
    pub fn new(modifier: Modifier, quantity: i64) -> Self {
        ModifierSelection { modifier, quantity }
    }

    /// The selection's contribution to the line: price × quantity.
    pub fn total(&self) -> Money {
        self.modifier.price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Line Price
// =============================================================================

/// The priced breakdown of one order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinePrice {
    /// Product base price plus variant adjustment. Excludes modifiers.
    pub unit_price: Money,
    /// Sum of modifier price × selected quantity over the line's selections.
    pub modifiers_total: Money,
    /// `unit_price × line quantity + modifiers_total`.
    pub extended_total: Money,
}

/// Prices one order line.
///
/// Pure function: the inputs fully determine the output. Validation (variant
/// ownership, modifier scope, positive quantities, non-negative unit price)
/// happens in the cart before a line exists, so this function only composes.
pub fn price_line(
    product: &Product,
    variant: Option<&Variant>,
    selections: &[ModifierSelection],
    quantity: i64,
) -> LinePrice {
    let unit_price = product.base_price()
        + variant.map(Variant::adjustment).unwrap_or_else(Money::zero);

    let modifiers_total: Money = selections.iter().map(ModifierSelection::total).sum();

    let extended_total = unit_price.multiply_quantity(quantity) + modifiers_total;

    LinePrice {
        unit_price,
        modifiers_total,
        extended_total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
