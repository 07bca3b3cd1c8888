//! CLI subcommands.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Resolve the database URL the way the server does: `MANDI_DATABASE_URL`
/// first, `DATABASE_URL` as a fallback.
pub fn database_url() -> Result<SecretString, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    std::env::var("MANDI_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "MANDI_DATABASE_URL (or DATABASE_URL) not set".into())
}
