//! # Cart (Draft Order Aggregator)
//!
//! The in-memory, single-session draft order built incrementally before
//! checkout.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cart Operations                                    │
//! │                                                                         │
//! │  UI Action                Operation              State Change           │
//! │  ─────────                ─────────              ────────────           │
//! │  Pick product+variant ──► add_line() ──────────► lines.push(line)      │
//! │  Remove order row ──────► remove_line(index) ──► lines.remove(index)   │
//! │  Clear order ───────────► clear() ─────────────► lines.clear()         │
//! │  Show total ────────────► total() ─────────────► (read only)           │
//! │                                                                         │
//! │  Lines are NEVER merged: adding the same product twice produces two    │
//! │  independent lines, because each checkout action is independent.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Validation at the Door
//! `add_line` is the single place where a line's shape is checked: positive
//! quantity, variant ownership, modifier scope, non-negative unit price.
//! Once a line exists it is priceable without further checks.
//!
//! The cart holds no persisted state; it is scoped to one session and
//! discarded at checkout.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::pricing::{price_line, LinePrice, ModifierSelection};
use crate::types::{ModifierScope, Product, Variant};
use crate::validation::{validate_quantity, validate_unit_price};

// =============================================================================
// Cart Line
// =============================================================================

/// One draft order line: product (+ optional variant) + modifiers + quantity.
///
/// The product, variant and modifiers are cloned snapshots taken when the
/// line was added, so the cart displays consistent data even if the catalog
/// is edited while an order is open. Checkout snapshots prices again from
/// these values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub variant: Option<Variant>,
    pub selections: Vec<ModifierSelection>,
    pub quantity: i64,
}

impl CartLine {
    /// Prices this line via the pricing engine.
    pub fn price(&self) -> LinePrice {
        price_line(
            &self.product,
            self.variant.as_ref(),
            &self.selections,
            self.quantity,
        )
    }
}

// =============================================================================
// Cart
// =============================================================================

/// An ordered, mutable sequence of draft order lines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Appends a draft line after validating it.
    ///
    /// ## Failures (all before any state change)
    /// - quantity ≤ 0
    /// - the variant does not belong to the product
    /// - a selected modifier is scoped to a different product or variant
    /// - a selection quantity is negative (zero-quantity selections are
    ///   dropped from the line rather than stored)
    /// - the product/variant pairing yields a negative unit price
    pub fn add_line(
        &mut self,
        product: Product,
        variant: Option<Variant>,
        selections: Vec<ModifierSelection>,
        quantity: i64,
    ) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(variant) = &variant {
            let product_id = product.id.ok_or(ValidationError::Unsaved { entity: "product" })?;
            if variant.product_id != product_id {
                return Err(ValidationError::VariantMismatch {
                    variant_id: variant.id.unwrap_or(0),
                    product_id,
                }
                .into());
            }
        }

        validate_unit_price(&product, variant.as_ref())?;

        let mut kept = Vec::with_capacity(selections.len());
        for selection in selections {
            // A zero/cancelled selection removes the modifier from the line
            // entirely; only negative quantities are an error.
            if selection.quantity == 0 {
                continue;
            }
            validate_quantity(selection.quantity)?;
            Self::check_selection_scope(&product, variant.as_ref(), &selection)?;
            kept.push(selection);
        }

        self.lines.push(CartLine {
            product,
            variant,
            selections: kept,
            quantity,
        });
        Ok(())
    }

    /// A selected modifier must be global, scoped to the line's product, or
    /// scoped to the line's variant.
    fn check_selection_scope(
        product: &Product,
        variant: Option<&Variant>,
        selection: &ModifierSelection,
    ) -> Result<(), ValidationError> {
        match selection.modifier.scope()? {
            ModifierScope::Global => Ok(()),
            ModifierScope::Product(pid) => {
                if product.id == Some(pid) {
                    Ok(())
                } else {
                    Err(ValidationError::ScopeMismatch {
                        modifier: selection.modifier.name_primary.clone(),
                        reason: format!("scoped to product {pid}"),
                    })
                }
            }
            ModifierScope::Variant(vid) => {
                if variant.and_then(|v| v.id) == Some(vid) {
                    Ok(())
                } else {
                    Err(ValidationError::ScopeMismatch {
                        modifier: selection.modifier.name_primary.clone(),
                        reason: format!("scoped to variant {vid}"),
                    })
                }
            }
        }
    }

    /// Removes and returns the line at `index`.
    pub fn remove_line(&mut self, index: usize) -> CoreResult<CartLine> {
        if index >= self.lines.len() {
            return Err(CoreError::LineNotFound { index });
        }
        Ok(self.lines.remove(index))
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of extended totals over all lines.
    pub fn total(&self) -> Money {
        self.lines.iter().map(|line| line.price().extended_total).sum()
    }

    /// The draft lines, in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
