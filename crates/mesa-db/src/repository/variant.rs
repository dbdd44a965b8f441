//! # Variant Repository
//!
//! Database operations for product variants.
//!
//! Variants die with their product (`ON DELETE CASCADE`); the domain guard
//! in [`crate::catalog`] refuses to delete a product that still has variants
//! so the cascade never silently destroys data.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::repository::Repository;
use mesa_core::validation::validate_name_pair;
use mesa_core::Variant;

/// Repository for variant database operations.
#[derive(Debug, Clone)]
pub struct VariantRepository {
    pool: SqlitePool,
}

impl VariantRepository {
    /// Creates a new VariantRepository.
    pub fn new(pool: SqlitePool) -> Self {
        VariantRepository { pool }
    }

    /// Lists the variants of a product, in insertion order.
    pub async fn get_by_product(&self, product_id: i64) -> StoreResult<Vec<Variant>> {
        let variants = sqlx::query_as::<_, Variant>(
            "SELECT * FROM variants WHERE product_id = ?1 ORDER BY id",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(variants)
    }

    /// Counts the variants of a product (deletion guard input).
    pub async fn count_by_product(&self, product_id: i64) -> StoreResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM variants WHERE product_id = ?1")
                .bind(product_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

impl Repository for VariantRepository {
    type Entity = Variant;

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Variant>> {
        let variant = sqlx::query_as::<_, Variant>(
            "SELECT * FROM variants WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(variant)
    }

    async fn get_all(&self) -> StoreResult<Vec<Variant>> {
        let variants = sqlx::query_as::<_, Variant>(
            "SELECT * FROM variants ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(variants)
    }

    async fn save(&self, variant: &mut Variant) -> StoreResult<()> {
        validate_name_pair(&variant.name_primary, &variant.name_secondary)?;

        let now = Utc::now();

        match variant.id {
            None => {
                debug!(name = %variant.name_primary, product_id = %variant.product_id, "inserting variant");

                let result = sqlx::query(
                    r#"
                    INSERT INTO variants (
                        product_id, name_primary, name_secondary,
                        adjustment_cents, created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    "#,
                )
                .bind(variant.product_id)
                .bind(&variant.name_primary)
                .bind(&variant.name_secondary)
                .bind(variant.adjustment_cents)
                .bind(now)
                .bind(now)
                .execute(&self.pool)
                .await?;

                variant.id = Some(result.last_insert_rowid());
                variant.created_at = now;
                variant.updated_at = now;
            }
            Some(id) => {
                debug!(id = %id, "updating variant");

                let result = sqlx::query(
                    r#"
                    UPDATE variants SET
                        product_id = ?2,
                        name_primary = ?3,
                        name_secondary = ?4,
                        adjustment_cents = ?5,
                        updated_at = ?6
                    WHERE id = ?1
                    "#,
                )
                .bind(id)
                .bind(variant.product_id)
                .bind(&variant.name_primary)
                .bind(&variant.name_secondary)
                .bind(variant.adjustment_cents)
                .bind(now)
                .execute(&self.pool)
                .await?;

                if result.rows_affected() == 0 {
                    return Err(StoreError::not_found("Variant", id));
                }

                variant.updated_at = now;
            }
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        debug!(id = %id, "deleting variant");

        let result = sqlx::query("DELETE FROM variants WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Variant", id));
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
    use mesa_core::{Money, Product};

    async fn store_with_product() -> (Store, i64) {
        let store = Store::new(StoreConfig::in_memory()).await.unwrap();
        let mut product = Product::new("Café", "Coffee", Money::from_cents(300));
        store.products().save(&mut product).await.unwrap();
        let id = product.id.unwrap();
        (store, id)
    }

    #[tokio::test]
    async fn test_insert_and_scoped_listing() {
        let (store, product_id) = store_with_product().await;
        let repo = store.variants();

        let mut small = Variant::new(product_id, "Chico", "Small");
        small.adjustment_cents = -50;
        repo.save(&mut small).await.unwrap();

        let mut large = Variant::new(product_id, "Grande", "Large");
        large.adjustment_cents = 100;
        repo.save(&mut large).await.unwrap();

        let variants = repo.get_by_product(product_id).await.unwrap();
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].name_primary, "Chico");
        assert_eq!(variants[0].adjustment_cents, -50);
        assert_eq!(repo.count_by_product(product_id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_orphan_variant_rejected_by_fk() {
        let (store, _) = store_with_product().await;

        let mut orphan = Variant::new(9999, "Fantasma", "Ghost");
        let err = store.variants().save(&mut orphan).await.unwrap_err();
        assert!(matches!(err, StoreError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_product_delete_cascades_to_variants() {
        // Storage-level cascade (the domain guard normally refuses this
        // delete while variants exist).
        let (store, product_id) = store_with_product().await;

        let mut variant = Variant::new(product_id, "Grande", "Large");
        store.variants().save(&mut variant).await.unwrap();

        store.products().delete(product_id).await.unwrap();
        assert!(store
            .variants()
            .get_by_id(variant.id.unwrap())
            .await
            .unwrap()
            .is_none());
    }
}
