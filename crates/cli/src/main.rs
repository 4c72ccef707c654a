//! shopcart - inspect and edit the local shopping cart.
//!
//! # Usage
//!
//! ```bash
//! shopcart add 3        # one more unit of product 3
//! shopcart set 3 5      # exactly five units (0 or less is ignored)
//! shopcart remove 3
//! shopcart show
//! ```
//!
//! Product and stock data come from the catalogue API at `SHOPCART_API_URL`;
//! the cart itself is kept under `SHOPCART_DATA_DIR`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use shopcart_cart::{Cart, CartOperation, CartStore, FileSnapshotStore, SnapshotStore};
use shopcart_core::ProductId;
use shopcart_inventory::{HttpInventoryClient, InventoryClient};

mod config;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "shopcart")]
#[command(author, version, about = "Local shopping cart backed by the catalogue API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Add one unit of a product
    Add { product_id: ProductId },
    /// Remove a product from the cart
    Remove { product_id: ProductId },
    /// Set the amount of a product already in the cart
    Set {
        product_id: ProductId,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
    /// Print the cart as JSON
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    shopcart_observability::init(CliConfig::log_format_from_env()?);

    let cli = Cli::parse();
    let config = CliConfig::from_env()?;

    let inventory = match &config.api_token {
        Some(token) => HttpInventoryClient::with_token(&config.api_url, token),
        None => HttpInventoryClient::new(&config.api_url),
    };
    let snapshots = match &config.data_dir {
        Some(dir) => FileSnapshotStore::new(dir),
        None => FileSnapshotStore::in_default_dir().context("no data directory available")?,
    };
    tracing::debug!(path = ?snapshots.path(), api = %config.api_url, "cart store configured");

    let store = CartStore::open(inventory, snapshots).with_policy(config.concurrency);

    match run(&store, cli.command).await {
        Outcome::Cart(cart) => print_cart(&cart),
        Outcome::Failed(message) => {
            eprintln!("{message}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// What a command leaves for the user to see.
#[derive(Debug)]
enum Outcome {
    Cart(Cart),
    Failed(&'static str),
}

async fn run<I, S>(store: &CartStore<I, S>, command: Command) -> Outcome
where
    I: InventoryClient,
    S: SnapshotStore,
{
    let (operation, result) = match command {
        Command::Show => return Outcome::Cart(store.cart()),
        Command::Add { product_id } => (
            CartOperation::AddProduct,
            store.add_product(product_id).await,
        ),
        Command::Remove { product_id } => (
            CartOperation::RemoveProduct,
            store.remove_product(product_id).await,
        ),
        Command::Set { product_id, amount } => (
            CartOperation::SetQuantity,
            store.set_quantity(product_id, amount).await,
        ),
    };

    match result {
        Ok(cart) => Outcome::Cart(cart),
        Err(e) => {
            tracing::error!(error = %e, "cart command failed");
            Outcome::Failed(e.user_message(operation))
        }
    }
}

fn print_cart(cart: &Cart) -> anyhow::Result<ExitCode> {
    let json = serde_json::to_string_pretty(cart).context("failed to render cart")?;
    println!("{json}");
    Ok(ExitCode::SUCCESS)
}
