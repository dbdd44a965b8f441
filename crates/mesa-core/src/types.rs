//! # Domain Types
//!
//! Core domain types used throughout Mesa POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Catalog Hierarchy                                 │
//! │                                                                         │
//! │   Category ──owns──► Product ──owns──► Variant                         │
//! │   (SET NULL)          │    │            │                               │
//! │                       │    └─owns─► Modifier (product-scoped)          │
//! │                       │                 │                               │
//! │                       │                 └── Modifier (variant-scoped)  │
//! │                       │                                                 │
//! │                  Modifier (global: no product, no variant)             │
//! │                                                                         │
//! │                       Sale Records (immutable)                          │
//! │                                                                         │
//! │   Sale ──owns──► SaleItem ──owns──► SaleItemModifier                   │
//! │                  (price snapshots, never re-read from the catalog)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Pattern
//! Every entity carries `id: Option<i64>`. `None` means "not yet persisted";
//! the store assigns a positive, never-reused integer on first save.
//!
//! ## Bilingual Pattern
//! Display names come in a primary/secondary pair (the reference deployment
//! uses Spanish/English). The language choice affects display lookup ONLY -
//! it never influences any computation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Language
// =============================================================================

/// Which half of a bilingual name/description pair to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// The primary language of the deployment (reference: Spanish).
    Primary,
    /// The secondary language (reference: English).
    Secondary,
}

impl Default for Language {
    fn default() -> Self {
        Language::Primary
    }
}

// =============================================================================
// Category
// =============================================================================

/// A top-level grouping of products.
///
/// Both names are required and each is unique across categories within its
/// own language column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    /// Store-assigned identifier. `None` until first save.
    pub id: Option<i64>,
    pub name_primary: String,
    pub name_secondary: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Creates an unsaved category with both display names.
    pub fn new(name_primary: impl Into<String>, name_secondary: impl Into<String>) -> Self {
        let now = Utc::now();
        Category {
            id: None,
            name_primary: name_primary.into(),
            name_secondary: name_secondary.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Resolves the display name for a language. Display only.
    pub fn name(&self, lang: Language) -> &str {
        match lang {
            Language::Primary => &self.name_primary,
            Language::Secondary => &self.name_secondary,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A sellable item, optionally grouped under a category.
///
/// A product survives category deletion by detaching (`category_id` becomes
/// `None`, the storage engine's SET NULL policy).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Store-assigned identifier. `None` until first save.
    pub id: Option<i64>,
    /// Owning category, if any.
    pub category_id: Option<i64>,
    pub name_primary: String,
    pub name_secondary: String,
    pub description_primary: Option<String>,
    pub description_secondary: Option<String>,
    /// Base price in cents (non-negative).
    pub base_price_cents: i64,
    /// Opaque image path/identifier. The core never touches the file system.
    pub image_path: Option<String>,
    /// Advisory availability flag for the order-entry UI.
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates an unsaved product with the required fields; optional fields
    /// default to empty and the product starts available.
    pub fn new(
        name_primary: impl Into<String>,
        name_secondary: impl Into<String>,
        base_price: Money,
    ) -> Self {
        let now = Utc::now();
        Product {
            id: None,
            category_id: None,
            name_primary: name_primary.into(),
            name_secondary: name_secondary.into(),
            description_primary: None,
            description_secondary: None,
            base_price_cents: base_price.cents(),
            image_path: None,
            is_available: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the base price as a Money type.
    #[inline]
    pub fn base_price(&self) -> Money {
        Money::from_cents(self.base_price_cents)
    }

    /// Resolves the display name for a language. Display only.
    pub fn name(&self, lang: Language) -> &str {
        match lang {
            Language::Primary => &self.name_primary,
            Language::Secondary => &self.name_secondary,
        }
    }

    /// Resolves the description for a language. Display only.
    pub fn description(&self, lang: Language) -> Option<&str> {
        match lang {
            Language::Primary => self.description_primary.as_deref(),
            Language::Secondary => self.description_secondary.as_deref(),
        }
    }
}

// =============================================================================
// Variant
// =============================================================================

/// A variation of a product (e.g. Small / Medium / Large).
///
/// The adjustment is signed and added to the product base price; a variant
/// is deleted together with its product (CASCADE).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Variant {
    /// Store-assigned identifier. `None` until first save.
    pub id: Option<i64>,
    /// Owning product.
    pub product_id: i64,
    pub name_primary: String,
    pub name_secondary: String,
    /// Signed price adjustment in cents, added to the product base price.
    pub adjustment_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Variant {
    /// Creates an unsaved variant for a product with zero adjustment.
    pub fn new(
        product_id: i64,
        name_primary: impl Into<String>,
        name_secondary: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Variant {
            id: None,
            product_id,
            name_primary: name_primary.into(),
            name_secondary: name_secondary.into(),
            adjustment_cents: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the price adjustment as a Money type.
    #[inline]
    pub fn adjustment(&self) -> Money {
        Money::from_cents(self.adjustment_cents)
    }

    /// Resolves the display name for a language. Display only.
    pub fn name(&self, lang: Language) -> &str {
        match lang {
            Language::Primary => &self.name_primary,
            Language::Secondary => &self.name_secondary,
        }
    }
}

// =============================================================================
// Modifier
// =============================================================================

/// The scope a modifier applies to.
///
/// Derived from the `(product_id, variant_id)` pair; a modifier has at most
/// one non-null scope reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierScope {
    /// Applicable to any line.
    Global,
    /// Applicable only to lines for this product.
    Product(i64),
    /// Applicable only to lines for this variant.
    Variant(i64),
}

/// An add-on or discount applied to an order line (e.g. Extra Cheese).
///
/// The price is signed: a negative price is a discount. Deleting the
/// referenced product or variant cascades to its scoped modifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Modifier {
    /// Store-assigned identifier. `None` until first save.
    pub id: Option<i64>,
    pub name_primary: String,
    pub name_secondary: String,
    /// Signed price in cents. Negative means discount.
    pub price_cents: i64,
    /// Set for product-scoped modifiers, `None` otherwise.
    pub product_id: Option<i64>,
    /// Set for variant-scoped modifiers, `None` otherwise.
    pub variant_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Modifier {
    /// Creates an unsaved global modifier.
    pub fn new(
        name_primary: impl Into<String>,
        name_secondary: impl Into<String>,
        price: Money,
    ) -> Self {
        let now = Utc::now();
        Modifier {
            id: None,
            name_primary: name_primary.into(),
            name_secondary: name_secondary.into(),
            price_cents: price.cents(),
            product_id: None,
            variant_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Scopes the modifier to a product.
    pub fn for_product(mut self, product_id: i64) -> Self {
        self.product_id = Some(product_id);
        self
    }

    /// Scopes the modifier to a variant.
    pub fn for_variant(mut self, variant_id: i64) -> Self {
        self.variant_id = Some(variant_id);
        self
    }

    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Derives the modifier's scope from its reference pair.
    ///
    /// Fails when both references are set, which violates the at-most-one
    /// scope invariant.
    pub fn scope(&self) -> Result<ModifierScope, ValidationError> {
        match (self.product_id, self.variant_id) {
            (None, None) => Ok(ModifierScope::Global),
            (Some(pid), None) => Ok(ModifierScope::Product(pid)),
            (None, Some(vid)) => Ok(ModifierScope::Variant(vid)),
            (Some(_), Some(_)) => Err(ValidationError::ConflictingScope),
        }
    }

    /// Resolves the display name for a language. Display only.
    pub fn name(&self, lang: Language) -> &str {
        match lang {
            Language::Primary => &self.name_primary,
            Language::Secondary => &self.name_secondary,
        }
    }
}

// =============================================================================
// Sale Records
// =============================================================================

/// A committed sale. Immutable once created.
///
/// `total_cents` equals the sum of the sale's item extended totals including
/// their modifiers, frozen at commit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: Option<i64>,
    pub total_cents: i64,
    /// When the sale was committed.
    pub sale_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the sale total as a Money type.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line item in a committed sale.
///
/// Uses the snapshot pattern: `unit_price_cents` is the product base price
/// plus variant adjustment at the moment of sale, independent of any later
/// catalog edit. Modifier prices are snapshotted separately per
/// [`SaleItemModifier`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItem {
    pub id: Option<i64>,
    pub sale_id: i64,
    pub product_id: i64,
    pub variant_id: Option<i64>,
    /// Quantity sold (positive).
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen, excludes modifiers).
    pub unit_price_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl SaleItem {
    /// Returns the unit price snapshot as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

/// A modifier applied to a committed sale item, with its own price snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItemModifier {
    pub id: Option<i64>,
    pub sale_item_id: i64,
    pub modifier_id: i64,
    /// Selected quantity (positive); multiplies the modifier price.
    pub quantity: i64,
    /// Modifier price in cents at time of sale (frozen).
    pub price_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl SaleItemModifier {
    /// Returns the price snapshot as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
