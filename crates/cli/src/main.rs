//! Mandi CLI - Database migrations and seeding.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending migrations
//! mandi-cli migrate
//!
//! # Seed a demo farmer, buyer, and a few listings
//! mandi-cli seed
//! ```
//!
//! Both commands read `MANDI_DATABASE_URL` (falling back to `DATABASE_URL`)
//! from the environment or a `.env` file.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "mandi-cli")]
#[command(author, version, about = "Mandi CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Seed the database with demo accounts and listings
    Seed,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Seed => commands::seed::run().await,
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}
