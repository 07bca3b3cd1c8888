//! Database migration command.
//!
//! Applies the migrations embedded in the `mandi-api` crate. Migrations are
//! never run automatically by the server; deploys run this first.

use tracing::info;

use mandi_api::db;

/// Apply pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    info!("Running migrations...");
    db::MIGRATOR.run(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}
