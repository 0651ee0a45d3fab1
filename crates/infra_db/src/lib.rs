//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the claims system using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: [`repositories::PgClaimStore`]
//! implements the `ClaimStore` port defined in `domain_claims`, hiding all
//! SQL behind the port boundary. Queries are runtime-checked so builds do
//! not require a live database.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, PgClaimStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/claims")).await?;
//! infra_db::MIGRATOR.run(&pool).await?;
//! let store = PgClaimStore::new(pool);
//! ```

pub mod error;
pub mod pool;
pub mod repositories;

pub use error::DatabaseError;
pub use pool::{create_pool, create_pool_from_url, DatabaseConfig, DatabasePool};
pub use repositories::PgClaimStore;

/// Embedded SQL migrations (`migrations/`)
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
