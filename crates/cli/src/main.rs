//! Pixelshelf CLI - browse the catalog, manage the cart, check out.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog (featured only, or by category)
//! pixelshelf catalog list --featured
//! pixelshelf catalog list --category icons
//!
//! # Manage the cart
//! pixelshelf cart add 1 v2 -q 2
//! pixelshelf cart update 1 v2 3
//! pixelshelf cart remove 1 v2
//! pixelshelf cart show
//! pixelshelf cart clear
//!
//! # Place an order (mocked payment)
//! pixelshelf checkout --name "Ada" --email ada@example.com \
//!     --card 4242424242424242 --expiry 12/30 --cvc 123
//! ```
//!
//! The cart persists between invocations in `$PIXELSHELF_DATA_DIR/cart.json`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::num::NonZeroU32;

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;

use commands::checkout::CheckoutArgs;
use config::{CliConfig, LogFormat};
use error::CliError;

#[derive(Parser)]
#[command(name = "pixelshelf")]
#[command(author, version, about = "Pixelshelf storefront CLI")]
struct Cli {
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
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartCommand,
    },
    /// Place an order for the current cart
    Checkout {
        /// Customer name
        #[arg(short, long)]
        name: String,

        /// Customer email address
        #[arg(short, long)]
        email: String,

        /// Card number (mocked payment, never charged)
        #[arg(long)]
        card: String,

        /// Card expiry as MM/YY
        #[arg(long)]
        expiry: String,

        /// Card security code
        #[arg(long)]
        cvc: String,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products and their variants
    List {
        /// Only featured products
        #[arg(short, long)]
        featured: bool,

        /// Only products in this category
        #[arg(short, long)]
        category: Option<String>,
    },
}

#[derive(Subcommand)]
enum CartCommand {
    /// Show cart contents and subtotal
    Show,
    /// Add a product variant
    Add {
        product: String,
        variant: String,

        /// Number of units to add
        #[arg(short, long, default_value = "1")]
        quantity: NonZeroU32,
    },
    /// Set a line's quantity (0 removes it)
    Update {
        product: String,
        variant: String,
        quantity: u32,
    },
    /// Remove a line
    Remove { product: String, variant: String },
    /// Remove every line
    Clear,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = CliConfig::from_env();

    init_tracing(
        config
            .as_ref()
            .map_or(LogFormat::default(), |c| c.log_format),
    );

    let result = match config {
        Ok(config) => run(cli, &config).await,
        Err(e) => Err(CliError::from(e)),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &CliConfig) -> error::Result<()> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List { featured, category } => {
                commands::catalog::list(config, featured, category.as_deref()).await?;
            }
        },
        Commands::Cart { action } => match action {
            CartCommand::Show => commands::cart::show(config).await?,
            CartCommand::Add {
                product,
                variant,
                quantity,
            } => commands::cart::add(config, &product, &variant, quantity).await?,
            CartCommand::Update {
                product,
                variant,
                quantity,
            } => commands::cart::update(config, &product, &variant, quantity).await?,
            CartCommand::Remove { product, variant } => {
                commands::cart::remove(config, &product, &variant).await?;
            }
            CartCommand::Clear => commands::cart::clear(config).await?,
        },
        Commands::Checkout {
            name,
            email,
            card,
            expiry,
            cvc,
        } => {
            let args = CheckoutArgs {
                name,
                email,
                card: SecretString::from(card),
                expiry,
                cvc: SecretString::from(cvc),
            };
            commands::checkout::run(config, args).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_add_rejects_zero_quantity() {
        assert!(Cli::try_parse_from(["pixelshelf", "cart", "add", "1", "v1", "-q", "0"]).is_err());
        assert!(Cli::try_parse_from(["pixelshelf", "cart", "add", "1", "v1", "-q", "2"]).is_ok());
    }

    #[test]
    fn test_update_accepts_zero() {
        assert!(Cli::try_parse_from(["pixelshelf", "cart", "update", "1", "v1", "0"]).is_ok());
    }
}
