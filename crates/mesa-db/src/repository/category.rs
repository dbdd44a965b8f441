//! # Category Repository
//!
//! Database operations for categories.
//!
//! Categories are the simplest entity: a bilingual name pair, each half
//! unique within its own language column (enforced by the schema).

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::repository::Repository;
use mesa_core::validation::validate_name_pair;
use mesa_core::Category;

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }
}

impl Repository for CategoryRepository {
    type Entity = Category;

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn get_all(&self) -> StoreResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn save(&self, category: &mut Category) -> StoreResult<()> {
        validate_name_pair(&category.name_primary, &category.name_secondary)?;

        let now = Utc::now();

        match category.id {
            None => {
                debug!(name = %category.name_primary, "inserting category");

                let result = sqlx::query(
                    r#"
                    INSERT INTO categories (name_primary, name_secondary, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4)
                    "#,
                )
                .bind(&category.name_primary)
                .bind(&category.name_secondary)
                .bind(now)
                .bind(now)
                .execute(&self.pool)
                .await?;

                category.id = Some(result.last_insert_rowid());
                category.created_at = now;
                category.updated_at = now;
            }
            Some(id) => {
                debug!(id = %id, "updating category");

                let result = sqlx::query(
                    r#"
                    UPDATE categories SET
                        name_primary = ?2,
                        name_secondary = ?3,
                        updated_at = ?4
                    WHERE id = ?1
                    "#,
                )
                .bind(id)
                .bind(&category.name_primary)
                .bind(&category.name_secondary)
                .bind(now)
                .execute(&self.pool)
                .await?;

                if result.rows_affected() == 0 {
                    return Err(StoreError::not_found("Category", id));
                }

                category.updated_at = now;
            }
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        debug!(id = %id, "deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Category", id));
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

    async fn store() -> Store {
        Store::new(StoreConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_id() {
        let store = store().await;
        let repo = store.categories();

        let mut category = Category::new("Bebidas", "Drinks");
        assert!(category.id.is_none());

        repo.save(&mut category).await.unwrap();
        assert!(category.id.unwrap() > 0);
    }

    #[tokio::test]
    async fn test_round_trip_keeps_id_stable() {
        // save → load → save must keep field values and the id unchanged.
        let store = store().await;
        let repo = store.categories();

        let mut category = Category::new("Bebidas", "Drinks");
        repo.save(&mut category).await.unwrap();
        let id = category.id.unwrap();

        let mut loaded = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(loaded.name_primary, "Bebidas");
        assert_eq!(loaded.name_secondary, "Drinks");

        repo.save(&mut loaded).await.unwrap();
        assert_eq!(loaded.id, Some(id));

        let again = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(again.name_primary, "Bebidas");
        assert_eq!(again.name_secondary, "Drinks");
    }

    #[tokio::test]
    async fn test_get_all_in_insertion_order() {
        let store = store().await;
        let repo = store.categories();

        for (p, s) in [("Bebidas", "Drinks"), ("Postres", "Desserts"), ("Entradas", "Starters")] {
            let mut c = Category::new(p, s);
            repo.save(&mut c).await.unwrap();
        }

        let all = repo.get_all().await.unwrap();
        let names: Vec<&str> = all.iter().map(|c| c.name_primary.as_str()).collect();
        assert_eq!(names, vec!["Bebidas", "Postres", "Entradas"]);
    }

    #[tokio::test]
    async fn test_update_existing_row() {
        let store = store().await;
        let repo = store.categories();

        let mut category = Category::new("Bebidas", "Drinks");
        repo.save(&mut category).await.unwrap();

        category.name_secondary = "Beverages".to_string();
        repo.save(&mut category).await.unwrap();

        let loaded = repo.get_by_id(category.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(loaded.name_secondary, "Beverages");
    }

    #[tokio::test]
    async fn test_duplicate_name_is_unique_violation() {
        let store = store().await;
        let repo = store.categories();

        let mut first = Category::new("Bebidas", "Drinks");
        repo.save(&mut first).await.unwrap();

        let mut dup = Category::new("Bebidas", "Other");
        let err = repo.save(&mut dup).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_empty_name_rejected_before_write() {
        let store = store().await;
        let repo = store.categories();

        let mut bad = Category::new("", "Drinks");
        let err = repo.save(&mut bad).await.unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_and_not_found() {
        let store = store().await;
        let repo = store.categories();

        let mut category = Category::new("Bebidas", "Drinks");
        repo.save(&mut category).await.unwrap();
        let id = category.id.unwrap();

        repo.delete(id).await.unwrap();
        assert!(repo.get_by_id(id).await.unwrap().is_none());

        let err = repo.delete(id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
