//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - CRUD via the [`Repository`] contract
//! - Category-scoped listing for the catalog UI and the deletion guard
//!
//! ## SET NULL Safety Net
//! `products.category_id` carries `ON DELETE SET NULL`: a product survives
//! category deletion by detaching. The domain guard in [`crate::catalog`]
//! refuses to delete a populated category outright, so the SET NULL policy
//! only ever fires as a storage-level safety net.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::repository::Repository;
use mesa_core::validation::{validate_base_price, validate_name_pair};
use mesa_core::Product;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists the products belonging to a category, in insertion order.
    pub async fn get_by_category(&self, category_id: i64) -> StoreResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE category_id = ?1 ORDER BY id",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Counts the products in a category (deletion guard input).
    pub async fn count_by_category(&self, category_id: i64) -> StoreResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category_id = ?1")
                .bind(category_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

impl Repository for ProductRepository {
    type Entity = Product;

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn get_all(&self) -> StoreResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn save(&self, product: &mut Product) -> StoreResult<()> {
        validate_name_pair(&product.name_primary, &product.name_secondary)?;
        validate_base_price(product.base_price_cents)?;

        let now = Utc::now();

        match product.id {
            None => {
                debug!(name = %product.name_primary, "inserting product");

                let result = sqlx::query(
                    r#"
                    INSERT INTO products (
                        category_id, name_primary, name_secondary,
                        description_primary, description_secondary,
                        base_price_cents, image_path, is_available,
                        created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                    "#,
                )
                .bind(product.category_id)
                .bind(&product.name_primary)
                .bind(&product.name_secondary)
                .bind(&product.description_primary)
                .bind(&product.description_secondary)
                .bind(product.base_price_cents)
                .bind(&product.image_path)
                .bind(product.is_available)
                .bind(now)
                .bind(now)
                .execute(&self.pool)
                .await?;

                product.id = Some(result.last_insert_rowid());
                product.created_at = now;
                product.updated_at = now;
            }
            Some(id) => {
                debug!(id = %id, "updating product");

                let result = sqlx::query(
                    r#"
                    UPDATE products SET
                        category_id = ?2,
                        name_primary = ?3,
                        name_secondary = ?4,
                        description_primary = ?5,
                        description_secondary = ?6,
                        base_price_cents = ?7,
                        image_path = ?8,
                        is_available = ?9,
                        updated_at = ?10
                    WHERE id = ?1
                    "#,
                )
                .bind(id)
                .bind(product.category_id)
                .bind(&product.name_primary)
                .bind(&product.name_secondary)
                .bind(&product.description_primary)
                .bind(&product.description_secondary)
                .bind(product.base_price_cents)
                .bind(&product.image_path)
                .bind(product.is_available)
                .bind(now)
                .execute(&self.pool)
                .await?;

                if result.rows_affected() == 0 {
                    return Err(StoreError::not_found("Product", id));
                }

                product.updated_at = now;
            }
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        debug!(id = %id, "deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Product", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Store, StoreConfig};
    use mesa_core::{Category, Money};

    async fn store() -> Store {
        Store::new(StoreConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_load_full_row() {
        let store = store().await;
        let repo = store.products();

        let mut product = Product::new("Café con leche", "Latte", Money::from_cents(350));
        product.description_primary = Some("Con leche entera".to_string());
        product.image_path = Some("img/latte.png".to_string());
        repo.save(&mut product).await.unwrap();

        let loaded = repo.get_by_id(product.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(loaded.name_secondary, "Latte");
        assert_eq!(loaded.base_price_cents, 350);
        assert_eq!(loaded.description_primary.as_deref(), Some("Con leche entera"));
        assert_eq!(loaded.image_path.as_deref(), Some("img/latte.png"));
        assert!(loaded.is_available);
    }

    #[tokio::test]
    async fn test_negative_base_price_rejected() {
        let store = store().await;
        let repo = store.products();

        let mut bad = Product::new("Gratis", "Free", Money::from_cents(-1));
        assert!(matches!(
            repo.save(&mut bad).await.unwrap_err(),
            StoreError::Invalid(_)
        ));
    }

    #[tokio::test]
    async fn test_get_by_category_and_count() {
        let store = store().await;

        let mut drinks = Category::new("Bebidas", "Drinks");
        store.categories().save(&mut drinks).await.unwrap();
        let category_id = drinks.id.unwrap();

        let repo = store.products();
        for name in ["Café", "Té"] {
            let mut p = Product::new(name, name, Money::from_cents(200));
            p.category_id = Some(category_id);
            repo.save(&mut p).await.unwrap();
        }
        let mut loose = Product::new("Agua", "Water", Money::from_cents(100));
        repo.save(&mut loose).await.unwrap();

        assert_eq!(repo.get_by_category(category_id).await.unwrap().len(), 2);
        assert_eq!(repo.count_by_category(category_id).await.unwrap(), 2);
        assert_eq!(repo.get_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_category_delete_detaches_product() {
        // Storage-level SET NULL safety net (the domain guard normally
        // refuses to delete a populated category at all).
        let store = store().await;

        let mut drinks = Category::new("Bebidas", "Drinks");
        store.categories().save(&mut drinks).await.unwrap();
        let category_id = drinks.id.unwrap();

        let mut product = Product::new("Café", "Coffee", Money::from_cents(200));
        product.category_id = Some(category_id);
        store.products().save(&mut product).await.unwrap();

        store.categories().delete(category_id).await.unwrap();

        let survived = store
            .products()
            .get_by_id(product.id.unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(survived.category_id, None);
    }
}
