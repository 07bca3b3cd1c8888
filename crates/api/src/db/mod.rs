//! Database operations for the Mandi `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `app_user` - Farmers, buyers, and admins (with geolocation)
//! - `listing` - Produce listings (with geolocation copied from the owner)
//! - `cart` - One per buyer, created lazily
//! - `cart_item` - Cart entries, unique per (cart, listing)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p mandi-cli -- migrate
//! ```
//!
//! Repositories use runtime-checked queries (`query_as` + `FromRow`), so the
//! workspace builds without a database connection.

pub mod carts;
pub mod listings;
pub mod users;

pub use carts::CartRepository;
pub use listings::ListingRepository;
pub use users::UserRepository;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Errors from the repository layer.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A row holds data the domain types reject.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl RepositoryError {
    /// Map a sqlx error, turning unique violations into [`Self::Conflict`].
    pub(crate) fn from_sqlx(err: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict_message.to_owned());
        }
        Self::Database(err)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Embedded migrations for the Mandi database.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
