//! Boutique CLI - catalog browsing and a local cart.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! boutique catalog list --category فساتين
//! boutique catalog show 3
//!
//! # Keep a cart in ./.boutique
//! boutique cart add 3
//! boutique cart show
//!
//! # Print the WhatsApp order link
//! boutique checkout
//! ```
//!
//! # Commands
//!
//! - `catalog` - List and inspect products
//! - `cart` - Add, remove, clear and show the local cart
//! - `checkout` - Print the order hand-off link for the local cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use boutique_core::ProductId;
use boutique_storefront::config::StorefrontConfig;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "boutique")]
#[command(author, version, about = "Boutique CLI tools")]
struct Cli {
    /// Directory holding the local cart
    #[arg(long, global = true, env = "BOUTIQUE_DATA_DIR", default_value = ".boutique")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Print the WhatsApp order link for the local cart
    Checkout,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Only this category (`all` or `الكل` for every category)
        #[arg(short, long)]
        category: Option<String>,

        /// Case-insensitive search over title and description
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one product
    Show {
        /// Product id
        id: ProductId,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add one unit of a product
    Add {
        /// Product id
        id: ProductId,
    },
    /// Remove a product's entry
    Remove {
        /// Product id
        id: ProductId,
    },
    /// Empty the cart
    Clear,
    /// Show the cart
    Show,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let data_dir = cli.data_dir.as_path();

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List { category, search } => {
                commands::catalog::list(&config, category.as_deref(), search.as_deref()).await?;
            }
            CatalogAction::Show { id } => commands::catalog::show(&config, id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Add { id } => commands::cart::add(&config, data_dir, id).await?,
            CartAction::Remove { id } => commands::cart::remove(data_dir, id)?,
            CartAction::Clear => commands::cart::clear(data_dir)?,
            CartAction::Show => commands::cart::show(&config, data_dir),
        },
        Commands::Checkout => commands::cart::checkout(&config, data_dir)?,
    }
    Ok(())
}
