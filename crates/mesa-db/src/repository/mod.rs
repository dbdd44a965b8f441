//! # Repository Module
//!
//! Database repository implementations for Mesa POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Catalog / Checkout / UI collaborator                                  │
//! │       │                                                                 │
//! │       │  store.products().get_by_category(id)                          │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── get_by_id / get_all / save / delete   (Repository trait)          │
//! │  └── get_by_category                        (scoped finder)            │
//! │       │                                                                 │
//! │       │  Fixed SQL statement                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  One concrete repository per entity with its own fixed insert/update   │
//! │  statements - no reflection over field lists.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`category::CategoryRepository`] - category CRUD
//! - [`product::ProductRepository`] - product CRUD + category finder
//! - [`variant::VariantRepository`] - variant CRUD + product finder
//! - [`modifier::ModifierRepository`] - modifier CRUD + scope finders
//! - [`sale::SaleRepository`] - read-only access to committed sales

pub mod category;
pub mod modifier;
pub mod product;
pub mod sale;
pub mod variant;

use crate::error::StoreResult;

/// The uniform get/save/delete contract shared by the catalog entity kinds.
///
/// ## Save Semantics
/// `save` inserts when the entity's id is unset and assigns the new id back
/// onto the entity; otherwise it performs a full-row update of all mutable
/// fields by id.
///
/// ## Known Gap
/// Insertion is not idempotent: retrying a failed insert creates a
/// duplicate row with a fresh id. Callers must not blindly retry inserts
/// after a transient failure. Retrying `save` with an assigned id is safe
/// (it updates the same row).
#[allow(async_fn_in_trait)]
pub trait Repository {
    type Entity;

    /// Fetches one entity by id, `None` when it does not exist.
    async fn get_by_id(&self, id: i64) -> StoreResult<Option<Self::Entity>>;

    /// Fetches all entities in insertion order (fully materialized, not a
    /// live view).
    async fn get_all(&self) -> StoreResult<Vec<Self::Entity>>;

    /// Inserts (id unset) or updates (id set). On insert, writes the
    /// assigned id and timestamps back onto the entity.
    async fn save(&self, entity: &mut Self::Entity) -> StoreResult<()>;

    /// Physically removes the row. Cascade/restrict rules are enforced by
    /// the storage engine's foreign-key policy; domain-level guards live in
    /// [`crate::catalog`].
    async fn delete(&self, id: i64) -> StoreResult<()>;
}
