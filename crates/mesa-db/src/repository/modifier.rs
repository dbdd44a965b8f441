//! # Modifier Repository
//!
//! Database operations for modifiers.
//!
//! ## Scope Finders
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Which Modifiers Apply Where                           │
//! │                                                                         │
//! │  get_global()            product_id IS NULL AND variant_id IS NULL     │
//! │  get_by_product(p)       product_id = p   AND variant_id IS NULL       │
//! │  get_by_variant(v)       variant_id = v                                 │
//! │                                                                         │
//! │  get_applicable(p) = get_global() ∪ get_by_product(p)                   │
//! │  (what the order-entry UI offers for a product line)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::repository::Repository;
use mesa_core::validation::validate_modifier;
use mesa_core::Modifier;

/// Repository for modifier database operations.
#[derive(Debug, Clone)]
pub struct ModifierRepository {
    pool: SqlitePool,
}

impl ModifierRepository {
    /// Creates a new ModifierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ModifierRepository { pool }
    }

    /// Lists global modifiers (no product, no variant).
    pub async fn get_global(&self) -> StoreResult<Vec<Modifier>> {
        let modifiers = sqlx::query_as::<_, Modifier>(
            "SELECT * FROM modifiers WHERE product_id IS NULL AND variant_id IS NULL ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(modifiers)
    }

    /// Lists modifiers scoped to one product (excludes variant-scoped ones).
    pub async fn get_by_product(&self, product_id: i64) -> StoreResult<Vec<Modifier>> {
        let modifiers = sqlx::query_as::<_, Modifier>(
            "SELECT * FROM modifiers WHERE product_id = ?1 AND variant_id IS NULL ORDER BY id",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(modifiers)
    }

    /// Lists modifiers scoped to one variant.
    pub async fn get_by_variant(&self, variant_id: i64) -> StoreResult<Vec<Modifier>> {
        let modifiers = sqlx::query_as::<_, Modifier>(
            "SELECT * FROM modifiers WHERE variant_id = ?1 ORDER BY id",
        )
        .bind(variant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(modifiers)
    }

    /// Lists the modifiers the order-entry UI should offer for a product:
    /// global ones plus the product's own.
    pub async fn get_applicable(&self, product_id: i64) -> StoreResult<Vec<Modifier>> {
        let modifiers = sqlx::query_as::<_, Modifier>(
            r#"
            SELECT * FROM modifiers
            WHERE (product_id IS NULL AND variant_id IS NULL) OR (product_id = ?1)
            ORDER BY id
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(modifiers)
    }

    /// Counts the modifiers scoped to a product (deletion guard input).
    pub async fn count_by_product(&self, product_id: i64) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM modifiers WHERE product_id = ?1 AND variant_id IS NULL",
        )
        .bind(product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Counts the modifiers scoped to a variant (deletion guard input).
    pub async fn count_by_variant(&self, variant_id: i64) -> StoreResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM modifiers WHERE variant_id = ?1")
                .bind(variant_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

impl Repository for ModifierRepository {
    type Entity = Modifier;

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Modifier>> {
        let modifier = sqlx::query_as::<_, Modifier>(
            "SELECT * FROM modifiers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(modifier)
    }

    async fn get_all(&self) -> StoreResult<Vec<Modifier>> {
        let modifiers = sqlx::query_as::<_, Modifier>(
            "SELECT * FROM modifiers ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(modifiers)
    }

    async fn save(&self, modifier: &mut Modifier) -> StoreResult<()> {
        // Name pair and the at-most-one scope reference invariant.
        validate_modifier(modifier)?;

        let now = Utc::now();

        match modifier.id {
            None => {
                debug!(name = %modifier.name_primary, "inserting modifier");

                let result = sqlx::query(
                    r#"
                    INSERT INTO modifiers (
                        name_primary, name_secondary, price_cents,
                        product_id, variant_id, created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                    "#,
                )
                .bind(&modifier.name_primary)
                .bind(&modifier.name_secondary)
                .bind(modifier.price_cents)
                .bind(modifier.product_id)
                .bind(modifier.variant_id)
                .bind(now)
                .bind(now)
                .execute(&self.pool)
                .await?;

                modifier.id = Some(result.last_insert_rowid());
                modifier.created_at = now;
                modifier.updated_at = now;
            }
            Some(id) => {
                debug!(id = %id, "updating modifier");

                let result = sqlx::query(
                    r#"
                    UPDATE modifiers SET
                        name_primary = ?2,
                        name_secondary = ?3,
                        price_cents = ?4,
                        product_id = ?5,
                        variant_id = ?6,
                        updated_at = ?7
                    WHERE id = ?1
                    "#,
                )
                .bind(id)
                .bind(&modifier.name_primary)
                .bind(&modifier.name_secondary)
                .bind(modifier.price_cents)
                .bind(modifier.product_id)
                .bind(modifier.variant_id)
                .bind(now)
                .execute(&self.pool)
                .await?;

                if result.rows_affected() == 0 {
                    return Err(StoreError::not_found("Modifier", id));
                }

                modifier.updated_at = now;
            }
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        debug!(id = %id, "deleting modifier");

        let result = sqlx::query("DELETE FROM modifiers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Modifier", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
