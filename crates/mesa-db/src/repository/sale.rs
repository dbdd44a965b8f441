//! # Sale Repository
//!
//! Read-only access to completed sales and their line items.
//!
//! Sales are written exclusively through [`crate::store::Store::checkout`],
//! which freezes prices at sale time. This repository never mutates them,
//! so it does not implement the writable `Repository` trait.

use sqlx::SqlitePool;

use crate::error::StoreResult;
use mesa_core::{Sale, SaleItem, SaleItemModifier};

/// Read-only repository for sale history.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Fetches one sale header by id.
    pub async fn get_by_id(&self, id: i64) -> StoreResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Lists all sales, most recent first.
    pub async fn get_all(&self) -> StoreResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>("SELECT * FROM sales ORDER BY sale_date DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Lists the items of one sale, in insertion order.
    pub async fn get_items(&self, sale_id: i64) -> StoreResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            "SELECT * FROM sale_items WHERE sale_id = ?1 ORDER BY id",
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists the modifier snapshots attached to one sale item.
    pub async fn get_item_modifiers(&self, sale_item_id: i64) -> StoreResult<Vec<SaleItemModifier>> {
        let modifiers = sqlx::query_as::<_, SaleItemModifier>(
            "SELECT * FROM sale_item_modifiers WHERE sale_item_id = ?1 ORDER BY id",
        )
        .bind(sale_item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(modifiers)
    }

    /// Counts sale items that reference a product (deletion guard input).
    pub async fn count_items_for_product(&self, product_id: i64) -> StoreResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sale_items WHERE product_id = ?1")
                .bind(product_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Counts sale items that reference a variant (deletion guard input).
    pub async fn count_items_for_variant(&self, variant_id: i64) -> StoreResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sale_items WHERE variant_id = ?1")
                .bind(variant_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Counts sale item modifiers that reference a modifier (deletion guard input).
    pub async fn count_item_modifiers_for(&self, modifier_id: i64) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sale_item_modifiers WHERE modifier_id = ?1",
        )
        .bind(modifier_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
