//! # Checkout Transaction Engine
//!
//! Commits a cart as one atomic sale with frozen prices.
//!
//! ## Transaction Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Transaction                               │
//! │                                                                         │
//! │  validate cart (empty? unsaved entities?)   ← before any write          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │    INSERT sales            (total_cents, sale_date)                     │
//! │    for each cart line:                                                  │
//! │      INSERT sale_items     (unit_price_cents snapshot)                  │
//! │      for each selection:                                                │
//! │        INSERT sale_item_modifiers (price_cents snapshot)                │
//! │  COMMIT                                                                 │
//! │       │                                                                 │
//! │       ├── success → cart.clear(), return Sale                           │
//! │       └── failure → automatic ROLLBACK, cart untouched                  │
//! │                                                                         │
//! │  No partial sale ever exists. Snapshots make history immune to later   │
//! │  catalog price edits.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use mesa_core::{Cart, Sale, ValidationError};

/// Commits the cart as one atomic sale.
///
/// The cart is cleared only after a successful commit; any failure leaves it
/// intact so the caller can fix the problem and retry.
pub(crate) async fn checkout(pool: &SqlitePool, cart: &mut Cart) -> StoreResult<Sale> {
    if cart.is_empty() {
        return Err(StoreError::EmptyOrder);
    }

    // Every referenced entity must already be persisted; catching this here
    // keeps the transaction free of guaranteed-to-fail inserts.
    for line in cart.lines() {
        if line.product.id.is_none() {
            return Err(ValidationError::Unsaved { entity: "product" }.into());
        }
        if let Some(variant) = &line.variant {
            if variant.id.is_none() {
                return Err(ValidationError::Unsaved { entity: "variant" }.into());
            }
        }
        for selection in &line.selections {
            if selection.modifier.id.is_none() {
                return Err(ValidationError::Unsaved { entity: "modifier" }.into());
            }
        }
    }

    let total = cart.total();
    let now = Utc::now();

    debug!(lines = cart.len(), total = %total, "starting checkout transaction");

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| StoreError::TransactionFailed(e.to_string()))?;

    let sale_result = sqlx::query(
        "INSERT INTO sales (total_cents, sale_date, created_at) VALUES (?1, ?2, ?3)",
    )
    .bind(total.cents())
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let sale_id = sale_result.last_insert_rowid();

    for line in cart.lines() {
        let priced = line.price();

        let item_result = sqlx::query(
            r#"
            INSERT INTO sale_items (
                sale_id, product_id, variant_id, quantity, unit_price_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(sale_id)
        .bind(line.product.id)
        .bind(line.variant.as_ref().and_then(|v| v.id))
        .bind(line.quantity)
        .bind(priced.unit_price.cents())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let sale_item_id = item_result.last_insert_rowid();

        for selection in &line.selections {
            sqlx::query(
                r#"
                INSERT INTO sale_item_modifiers (
                    sale_item_id, modifier_id, quantity, price_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(sale_item_id)
            .bind(selection.modifier.id)
            .bind(selection.quantity)
            .bind(selection.modifier.price().cents())
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit()
        .await
        .map_err(|e| StoreError::TransactionFailed(e.to_string()))?;

    info!(sale_id = %sale_id, total = %total, "sale committed");

    // Only now is the draft spent.
    cart.clear();

    Ok(Sale {
        id: Some(sale_id),
        total_cents: total.cents(),
        sale_date: now,
        created_at: now,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::error::StoreError;
    use crate::repository::Repository;
    use crate::store::{Store, StoreConfig};
    use mesa_core::{Cart, Modifier, ModifierSelection, Money, Product, Variant};

    async fn store() -> Store {
        Store::new(StoreConfig::in_memory()).await.unwrap()
    }

    /// Scenario: one composed line (base 10.00, variant +2.00, modifier
    /// 1.50 × 2, qty 3 → 39.00) plus one plain line (10.00 × 2 → 20.00)
    /// checks out as a single 59.00 sale with nested snapshots.
    #[tokio::test]
    async fn test_checkout_two_lines() {
        let store = store().await;

        let mut pizza = Product::new("Pizza", "Pizza", Money::from_cents(1000));
        store.products().save(&mut pizza).await.unwrap();
        let mut family = Variant::new(pizza.id.unwrap(), "Familiar", "Family");
        family.adjustment_cents = 200;
        store.variants().save(&mut family).await.unwrap();
        let mut cheese = Modifier::new("Queso extra", "Extra cheese", Money::from_cents(150))
            .for_product(pizza.id.unwrap());
        store.modifiers().save(&mut cheese).await.unwrap();

        let mut torta = Product::new("Torta", "Sandwich", Money::from_cents(1000));
        store.products().save(&mut torta).await.unwrap();

        let mut cart = Cart::new();
        cart.add_line(
            pizza.clone(),
            Some(family.clone()),
            vec![ModifierSelection::new(cheese.clone(), 2)],
            3,
        )
        .unwrap();
        cart.add_line(torta.clone(), None, vec![], 2).unwrap();

        let sale = store.checkout(&mut cart).await.unwrap();

        assert_eq!(sale.total_cents, 5900);
        assert!(cart.is_empty());

        let sale_id = sale.id.unwrap();
        let loaded = store.sales().get_by_id(sale_id).await.unwrap().unwrap();
        assert_eq!(loaded.total_cents, 5900);

        let items = store.sales().get_items(sale_id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].unit_price_cents, 1200);
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[0].variant_id, family.id);
        assert_eq!(items[1].unit_price_cents, 1000);
        assert_eq!(items[1].variant_id, None);

        let snapshots = store
            .sales()
            .get_item_modifiers(items[0].id.unwrap())
            .await
            .unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].modifier_id, cheese.id.unwrap());
        assert_eq!(snapshots[0].quantity, 2);
        assert_eq!(snapshots[0].price_cents, 150);

        assert!(store
            .sales()
            .get_item_modifiers(items[1].id.unwrap())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_empty_cart_is_refused() {
        let store = store().await;
        let mut cart = Cart::new();

        let err = store.checkout(&mut cart).await.unwrap_err();
        assert!(matches!(err, StoreError::EmptyOrder));
        assert!(store.sales().get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unsaved_product_is_refused_before_any_write() {
        let store = store().await;

        let unsaved = Product::new("Fantasma", "Ghost", Money::from_cents(100));
        let mut cart = Cart::new();
        // Unsaved product has no id; the cart allows it (a draft may precede
        // persistence) but checkout must not.
        cart.add_line(unsaved, None, vec![], 1).unwrap();

        let err = store.checkout(&mut cart).await.unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
        assert_eq!(cart.len(), 1);
        assert!(store.sales().get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_rolls_back_everything() {
        let store = store().await;

        let mut real = Product::new("Café", "Coffee", Money::from_cents(300));
        store.products().save(&mut real).await.unwrap();

        // A product id that passes the pre-checks but violates the FK
        // inside the transaction, after the sale and first item are in.
        let mut phantom = Product::new("Fantasma", "Ghost", Money::from_cents(100));
        phantom.id = Some(9999);

        let mut cart = Cart::new();
        cart.add_line(real.clone(), None, vec![], 1).unwrap();
        cart.add_line(phantom, None, vec![], 1).unwrap();

        let err = store.checkout(&mut cart).await.unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation { .. }));

        // No partial sale: every table is untouched and the cart survives.
        assert!(store.sales().get_all().await.unwrap().is_empty());
        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_items")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(orphans, 0);
        assert_eq!(cart.len(), 2);
    }

    #[tokio::test]
    async fn test_snapshots_survive_catalog_edits() {
        let store = store().await;

        let mut product = Product::new("Café", "Coffee", Money::from_cents(300));
        store.products().save(&mut product).await.unwrap();
        let mut shot = Modifier::new("Shot extra", "Extra shot", Money::from_cents(100));
        store.modifiers().save(&mut shot).await.unwrap();

        let mut cart = Cart::new();
        cart.add_line(
            product.clone(),
            None,
            vec![ModifierSelection::new(shot.clone(), 1)],
            1,
        )
        .unwrap();
        let sale = store.checkout(&mut cart).await.unwrap();

        // Reprice the catalog after the fact.
        product.base_price_cents = 9900;
        store.products().save(&mut product).await.unwrap();
        shot.price_cents = 9900;
        store.modifiers().save(&mut shot).await.unwrap();

        let items = store.sales().get_items(sale.id.unwrap()).await.unwrap();
        assert_eq!(items[0].unit_price_cents, 300);
        let snapshots = store
            .sales()
            .get_item_modifiers(items[0].id.unwrap())
            .await
            .unwrap();
        assert_eq!(snapshots[0].price_cents, 100);

        let loaded = store
            .sales()
            .get_by_id(sale.id.unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.total_cents, 400);
    }

    #[tokio::test]
    async fn test_consecutive_checkouts_reuse_the_cart() {
        let store = store().await;

        let mut product = Product::new("Agua", "Water", Money::from_cents(150));
        store.products().save(&mut product).await.unwrap();

        let mut cart = Cart::new();

        cart.add_line(product.clone(), None, vec![], 1).unwrap();
        let first = store.checkout(&mut cart).await.unwrap();

        cart.add_line(product.clone(), None, vec![], 2).unwrap();
        let second = store.checkout(&mut cart).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.total_cents, 150);
        assert_eq!(second.total_cents, 300);
        assert_eq!(store.sales().get_all().await.unwrap().len(), 2);
    }
}
