//! # Store Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UI collaborator shows the error kind's message and leaves the         │
//! │  current form/cart state unchanged.                                    │
//! │                                                                         │
//! │  The store NEVER retries automatically. Checkout failure rolls back    │
//! │  and leaves the cart intact so the user can retry.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use mesa_core::ValidationError;
use thiserror::Error;

/// Database operation errors.
///
/// These wrap sqlx errors and carry the domain-level refusal kinds
/// (integrity guards, empty order, closed store).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// A domain deletion guard tripped, or the storage engine's restrict
    /// rule refused a delete that would orphan sale history.
    ///
    /// ## Why a Separate Kind
    /// The storage-level cascade for Product→Variant and Variant→Modifier
    /// would silently destroy data the user likely did not intend to lose;
    /// the domain layer makes this a hard stop with a clean message.
    #[error("delete refused: {reason}")]
    IntegrityRefusal { reason: String },

    /// Unique constraint violation (e.g. duplicate category name).
    #[error("duplicate {field}: value already exists")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation not covered by a pre-check.
    #[error("foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Checkout was attempted with an empty cart.
    #[error("cannot check out an empty order")]
    EmptyOrder,

    /// The store has been closed; no further operations are valid.
    #[error("store is closed")]
    Closed,

    /// Database connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Transaction begin/commit failed.
    #[error("transaction failed: {0}")]
    TransactionFailed(String),

    /// Input failed domain validation before any write was attempted.
    #[error("validation error: {0}")]
    Invalid(#[from] ValidationError),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        StoreError::NotFound { entity, id }
    }

    /// Creates an IntegrityRefusal with a user-facing reason.
    pub fn refusal(reason: impl Into<String>) -> Self {
        StoreError::IntegrityRefusal {
            reason: reason.into(),
        }
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::PoolClosed     → StoreError::Closed
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → StoreError::ConnectionFailed
/// Other                       → StoreError::QueryFailed
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed => StoreError::Closed,

            sqlx::Error::PoolTimedOut => {
                StoreError::ConnectionFailed("pool timed out".to_string())
            }

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message().to_string();

                // SQLite constraint messages:
                // UNIQUE: "UNIQUE constraint failed: <table>.<column>"
                // FK:     "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    StoreError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    StoreError::ForeignKeyViolation { message: msg }
                } else {
                    StoreError::QueryFailed(msg)
                }
            }

            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
