//! # Mesa DB
//!
//! SQLite persistence layer for Mesa POS.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         mesa-db                                         │
//! │                                                                         │
//! │  ┌─────────────┐   ┌──────────────┐   ┌──────────────────────────────┐ │
//! │  │   store     │──►│ repository   │──►│  SQLite (WAL, FKs on)        │ │
//! │  │ pool + cfg  │   │ per-entity   │   │  migrations embedded          │ │
//! │  └──────┬──────┘   │ CRUD + scoped│   └──────────────────────────────┘ │
//! │         │          │ finders      │                                    │
//! │         │          └──────────────┘                                    │
//! │         │                                                               │
//! │         ├──► catalog   guarded writes (IntegrityRefusal on deletes)    │
//! │         └──► checkout  atomic sale commit with price snapshots         │
//! │                                                                         │
//! │  Domain types and pricing live in mesa-core; this crate only           │
//! │  persists them.                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use mesa_db::{Store, StoreConfig, Repository};
//!
//! let store = Store::new(StoreConfig::new("./mesa.db")).await?;
//!
//! let mut category = Category::new("Bebidas", "Drinks");
//! store.catalog().save_category(&mut category).await?;
//!
//! let sale = store.checkout(&mut cart).await?;
//! store.close().await;
//! ```

pub mod catalog;
pub mod checkout;
pub mod error;
pub mod migrations;
pub mod repository;
pub mod store;

pub use catalog::Catalog;
pub use error::{StoreError, StoreResult};
pub use repository::category::CategoryRepository;
pub use repository::modifier::ModifierRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::variant::VariantRepository;
pub use repository::Repository;
pub use store::{Store, StoreConfig};
