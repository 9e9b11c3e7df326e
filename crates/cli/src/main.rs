//! Lustre CLI - Catalog management tools.
//!
//! # Usage
//!
//! ```bash
//! # Seed the catalog from a YAML file
//! lustre-cli seed products --file crates/cli/data/products.yaml
//!
//! # Validate a seed file without writing anything
//! lustre-cli seed products --file crates/cli/data/products.yaml --dry-run
//!
//! # List the catalog
//! lustre-cli products list
//!
//! # Delete a product
//! lustre-cli products delete cat-ring-1
//! ```
//!
//! # Commands
//!
//! - `seed products` - Create products from a YAML file
//! - `products list` - Print the remote catalog
//! - `products delete` - Delete a product by id
//!
//! All commands talk to the remote service configured by `LUSTRE_API_URL`
//! and `LUSTRE_API_KEY`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lustre-cli")]
#[command(author, version, about = "Lustre CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed data into the remote service
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage catalog products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Create products from a YAML file
    Products {
        /// Path to the YAML file
        #[arg(short, long)]
        file: String,

        /// Validate the file without creating anything
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List all products
    List,
    /// Delete a product
    Delete {
        /// Product id
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed { target } => match target {
            SeedTarget::Products { file, dry_run } => {
                commands::seed::products(&file, dry_run).await?;
            }
        },
        Commands::Products { action } => match action {
            ProductAction::List => commands::products::list().await?,
            ProductAction::Delete { id } => commands::products::delete(&id).await?,
        },
    }
    Ok(())
}
