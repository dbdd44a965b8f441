//! # Catalog Service
//!
//! The write surface for catalog management, layering domain deletion guards
//! over the raw repositories.
//!
//! ## Deletion Guards
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   What Blocks a Delete                                  │
//! │                                                                         │
//! │  Category  ──refused while──▶  it still has products                   │
//! │  Product   ──refused while──▶  it has variants or scoped modifiers,    │
//! │                                or sale history references it           │
//! │  Variant   ──refused while──▶  it has variant-scoped modifiers,        │
//! │                                or sale history references it           │
//! │  Modifier  ──refused while──▶  sale history references it              │
//! │                                                                         │
//! │  Detach or delete the children first, then retry. Sale history rows    │
//! │  are never deletable through this service at all.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The SQLite schema would cascade Product→Variant and Variant→Modifier on
//! its own; these guards turn that silent destruction into an explicit
//! [`StoreError::IntegrityRefusal`] the UI can show. Sale history is
//! pre-checked the same way, with the schema's RESTRICT rules as the
//! backstop under the guards.

use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::repository::Repository;
use crate::store::Store;
use mesa_core::validation::validate_unit_price;
use mesa_core::{Category, Modifier, Product, Variant};

/// Guarded write surface over the catalog repositories.
///
/// Cloning is cheap; the wrapped [`Store`] is a pool handle.
#[derive(Debug, Clone)]
pub struct Catalog {
    store: Store,
}

impl Catalog {
    /// Creates a catalog service over an open store.
    pub fn new(store: Store) -> Self {
        Catalog { store }
    }

    // =========================================================================
    // Saves
    // =========================================================================

    /// Inserts or updates a category.
    pub async fn save_category(&self, category: &mut Category) -> StoreResult<()> {
        self.store.categories().save(category).await
    }

    /// Inserts or updates a product.
    ///
    /// On update, refuses a base-price cut that would drive any existing
    /// variant's unit price below zero; the pairing would otherwise sit in
    /// the catalog unsellable.
    pub async fn save_product(&self, product: &mut Product) -> StoreResult<()> {
        if let Some(id) = product.id {
            for variant in self.store.variants().get_by_product(id).await? {
                validate_unit_price(product, Some(&variant))?;
            }
        }

        self.store.products().save(product).await
    }

    /// Inserts or updates a variant.
    ///
    /// Beyond the repository's own checks, refuses an adjustment that would
    /// drive the variant's unit price below zero against its product.
    pub async fn save_variant(&self, variant: &mut Variant) -> StoreResult<()> {
        let product = self
            .store
            .products()
            .get_by_id(variant.product_id)
            .await?
            .ok_or_else(|| StoreError::not_found("Product", variant.product_id))?;

        validate_unit_price(&product, Some(variant))?;

        self.store.variants().save(variant).await
    }

    /// Inserts or updates a modifier.
    pub async fn save_modifier(&self, modifier: &mut Modifier) -> StoreResult<()> {
        self.store.modifiers().save(modifier).await
    }

    // =========================================================================
    // Guarded Deletes
    // =========================================================================

    /// Deletes a category, refusing while any product still belongs to it.
    ///
    /// Detach the products first (clear their `category_id`) or delete them.
    pub async fn delete_category(&self, id: i64) -> StoreResult<()> {
        let products = self.store.products().count_by_category(id).await?;
        if products > 0 {
            debug!(id = %id, products = %products, "category delete refused");
            return Err(StoreError::refusal(format!(
                "category {id} still has {products} product(s); detach or delete them first"
            )));
        }

        self.store.categories().delete(id).await?;
        info!(id = %id, "category deleted");
        Ok(())
    }

    /// Deletes a product, refusing while it has variants or product-scoped
    /// modifiers.
    pub async fn delete_product(&self, id: i64) -> StoreResult<()> {
        let variants = self.store.variants().count_by_product(id).await?;
        if variants > 0 {
            debug!(id = %id, variants = %variants, "product delete refused");
            return Err(StoreError::refusal(format!(
                "product {id} still has {variants} variant(s); delete them first"
            )));
        }

        let modifiers = self.store.modifiers().count_by_product(id).await?;
        if modifiers > 0 {
            debug!(id = %id, modifiers = %modifiers, "product delete refused");
            return Err(StoreError::refusal(format!(
                "product {id} still has {modifiers} modifier(s); delete them first"
            )));
        }

        let sold = self.store.sales().count_items_for_product(id).await?;
        if sold > 0 {
            debug!(id = %id, sale_items = %sold, "product delete refused");
            return Err(StoreError::refusal(format!(
                "product {id} appears in {sold} sale item(s) and cannot be deleted"
            )));
        }

        // The schema's RESTRICT rule is the backstop under the pre-check.
        match self.store.products().delete(id).await {
            Err(StoreError::ForeignKeyViolation { .. }) => Err(StoreError::refusal(format!(
                "product {id} appears in sale history and cannot be deleted"
            ))),
            other => {
                if other.is_ok() {
                    info!(id = %id, "product deleted");
                }
                other
            }
        }
    }

    /// Deletes a variant, refusing while it has variant-scoped modifiers.
    pub async fn delete_variant(&self, id: i64) -> StoreResult<()> {
        let modifiers = self.store.modifiers().count_by_variant(id).await?;
        if modifiers > 0 {
            debug!(id = %id, modifiers = %modifiers, "variant delete refused");
            return Err(StoreError::refusal(format!(
                "variant {id} still has {modifiers} modifier(s); delete them first"
            )));
        }

        let sold = self.store.sales().count_items_for_variant(id).await?;
        if sold > 0 {
            debug!(id = %id, sale_items = %sold, "variant delete refused");
            return Err(StoreError::refusal(format!(
                "variant {id} appears in {sold} sale item(s) and cannot be deleted"
            )));
        }

        match self.store.variants().delete(id).await {
            Err(StoreError::ForeignKeyViolation { .. }) => Err(StoreError::refusal(format!(
                "variant {id} appears in sale history and cannot be deleted"
            ))),
            other => {
                if other.is_ok() {
                    info!(id = %id, "variant deleted");
                }
                other
            }
        }
    }

    /// Deletes a modifier, refusing while sale history references it.
    pub async fn delete_modifier(&self, id: i64) -> StoreResult<()> {
        let sold = self.store.sales().count_item_modifiers_for(id).await?;
        if sold > 0 {
            debug!(id = %id, sale_item_modifiers = %sold, "modifier delete refused");
            return Err(StoreError::refusal(format!(
                "modifier {id} appears in {sold} sale item modifier(s) and cannot be deleted"
            )));
        }

        match self.store.modifiers().delete(id).await {
            Err(StoreError::ForeignKeyViolation { .. }) => Err(StoreError::refusal(format!(
                "modifier {id} appears in sale history and cannot be deleted"
            ))),
            other => {
                if other.is_ok() {
                    info!(id = %id, "modifier deleted");
                }
                other
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreConfig;
    use mesa_core::{Cart, Money, ModifierSelection};

    async fn store() -> Store {
        Store::new(StoreConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_category_delete_refused_then_allowed() {
        let store = store().await;
        let catalog = store.catalog();

        let mut category = Category::new("Bebidas", "Drinks");
        catalog.save_category(&mut category).await.unwrap();
        let category_id = category.id.unwrap();

        let mut product = Product::new("Café", "Coffee", Money::from_cents(300));
        product.category_id = Some(category_id);
        catalog.save_product(&mut product).await.unwrap();

        let err = catalog.delete_category(category_id).await.unwrap_err();
        assert!(matches!(err, StoreError::IntegrityRefusal { .. }));

        // Detaching the product unblocks the delete.
        product.category_id = None;
        catalog.save_product(&mut product).await.unwrap();
        catalog.delete_category(category_id).await.unwrap();

        assert!(store
            .categories()
            .get_by_id(category_id)
            .await
            .unwrap()
            .is_none());
        // The detached product survives.
        assert!(store
            .products()
            .get_by_id(product.id.unwrap())
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_product_delete_refused_while_it_has_variants() {
        let store = store().await;
        let catalog = store.catalog();

        let mut product = Product::new("Pizza", "Pizza", Money::from_cents(900));
        catalog.save_product(&mut product).await.unwrap();
        let product_id = product.id.unwrap();

        let mut variant = Variant::new(product_id, "Familiar", "Family");
        catalog.save_variant(&mut variant).await.unwrap();

        let err = catalog.delete_product(product_id).await.unwrap_err();
        assert!(matches!(err, StoreError::IntegrityRefusal { .. }));

        catalog.delete_variant(variant.id.unwrap()).await.unwrap();
        catalog.delete_product(product_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_variant_delete_refused_while_it_has_modifiers() {
        let store = store().await;
        let catalog = store.catalog();

        let mut product = Product::new("Café", "Coffee", Money::from_cents(300));
        catalog.save_product(&mut product).await.unwrap();
        let mut variant = Variant::new(product.id.unwrap(), "Grande", "Large");
        catalog.save_variant(&mut variant).await.unwrap();
        let variant_id = variant.id.unwrap();

        let mut shot = Modifier::new("Shot extra", "Extra shot", Money::from_cents(100))
            .for_variant(variant_id);
        catalog.save_modifier(&mut shot).await.unwrap();

        let err = catalog.delete_variant(variant_id).await.unwrap_err();
        assert!(matches!(err, StoreError::IntegrityRefusal { .. }));

        catalog.delete_modifier(shot.id.unwrap()).await.unwrap();
        catalog.delete_variant(variant_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_modifier_referenced_by_sale_cannot_be_deleted() {
        let store = store().await;
        let catalog = store.catalog();

        let mut product = Product::new("Hamburguesa", "Burger", Money::from_cents(800));
        catalog.save_product(&mut product).await.unwrap();

        let mut cheese = Modifier::new("Queso extra", "Extra cheese", Money::from_cents(150))
            .for_product(product.id.unwrap());
        catalog.save_modifier(&mut cheese).await.unwrap();
        let modifier_id = cheese.id.unwrap();

        let mut cart = Cart::new();
        cart.add_line(
            product.clone(),
            None,
            vec![ModifierSelection::new(cheese.clone(), 1)],
            1,
        )
        .unwrap();
        store.checkout(&mut cart).await.unwrap();

        let err = catalog.delete_modifier(modifier_id).await.unwrap_err();
        assert!(matches!(err, StoreError::IntegrityRefusal { .. }));

        // Still present afterwards.
        assert!(store
            .modifiers()
            .get_by_id(modifier_id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_save_variant_rejects_negative_unit_price() {
        let store = store().await;
        let catalog = store.catalog();

        let mut product = Product::new("Café", "Coffee", Money::from_cents(200));
        catalog.save_product(&mut product).await.unwrap();

        let mut variant = Variant::new(product.id.unwrap(), "Imposible", "Impossible");
        variant.adjustment_cents = -300;

        let err = catalog.save_variant(&mut variant).await.unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
        assert!(variant.id.is_none());
    }

    #[tokio::test]
    async fn test_save_product_rejects_price_cut_below_variant_adjustment() {
        let store = store().await;
        let catalog = store.catalog();

        let mut product = Product::new("Café", "Coffee", Money::from_cents(500));
        catalog.save_product(&mut product).await.unwrap();

        let mut mini = Variant::new(product.id.unwrap(), "Mini", "Mini");
        mini.adjustment_cents = -300;
        catalog.save_variant(&mut mini).await.unwrap();

        // 2.00 base against a -3.00 adjustment would leave the pairing
        // unsellable; the cut is refused and the stored price unchanged.
        product.base_price_cents = 200;
        let err = catalog.save_product(&mut product).await.unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));

        let stored = store
            .products()
            .get_by_id(product.id.unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.base_price_cents, 500);

        // A cut that keeps every pairing at zero or above goes through.
        product.base_price_cents = 300;
        catalog.save_product(&mut product).await.unwrap();
    }

    #[tokio::test]
    async fn test_product_in_sale_history_cannot_be_deleted() {
        let store = store().await;
        let catalog = store.catalog();

        let mut product = Product::new("Agua", "Water", Money::from_cents(150));
        catalog.save_product(&mut product).await.unwrap();
        let product_id = product.id.unwrap();

        let mut cart = Cart::new();
        cart.add_line(product.clone(), None, vec![], 1).unwrap();
        store.checkout(&mut cart).await.unwrap();

        // No variants or modifiers block it; only the sale history does.
        let err = catalog.delete_product(product_id).await.unwrap_err();
        assert!(matches!(err, StoreError::IntegrityRefusal { .. }));
        assert!(store
            .products()
            .get_by_id(product_id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_variant_in_sale_history_cannot_be_deleted() {
        let store = store().await;
        let catalog = store.catalog();

        let mut product = Product::new("Pizza", "Pizza", Money::from_cents(900));
        catalog.save_product(&mut product).await.unwrap();
        let mut family = Variant::new(product.id.unwrap(), "Familiar", "Family");
        family.adjustment_cents = 300;
        catalog.save_variant(&mut family).await.unwrap();
        let variant_id = family.id.unwrap();

        let mut cart = Cart::new();
        cart.add_line(product.clone(), Some(family.clone()), vec![], 1)
            .unwrap();
        store.checkout(&mut cart).await.unwrap();

        let err = catalog.delete_variant(variant_id).await.unwrap_err();
        assert!(matches!(err, StoreError::IntegrityRefusal { .. }));
        assert!(store
            .variants()
            .get_by_id(variant_id)
            .await
            .unwrap()
            .is_some());
    }
}
