//! Farine CLI - drive the demo storefront from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! farine catalog list
//!
//! # Build a cart
//! farine cart add croissant-beurre --qty 2
//! farine cart list
//!
//! # Accounts
//! farine auth seed-demo
//! farine auth login -e demo@farine.com -p demo1234
//!
//! # Buy
//! farine checkout --name "Demo User" --email demo@farine.com \
//!     --address "1 Rue du Four" --city Lyon --zip 69001 --payment card
//! farine orders list
//! ```
//!
//! State persists as JSON documents under `FARINE_DATA_DIR` (default
//! `.farine/`), one file per store.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Parser, Subcommand};

use farine_core::PaymentMethod;
use farine_store::{AppState, Catalog, JsonFileStore};

mod commands;
mod config;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "farine")]
#[command(author, version, about = "Farine storefront CLI")]
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
        action: CartAction,
    },
    /// Manage accounts and the current session
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Browse order history
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Place an order from the current cart
    Checkout {
        /// Recipient name
        #[arg(long)]
        name: String,

        /// Contact email
        #[arg(long)]
        email: String,

        /// Contact phone
        #[arg(long, default_value = "")]
        phone: String,

        /// Street address
        #[arg(long)]
        address: String,

        /// City
        #[arg(long)]
        city: String,

        /// Postal code
        #[arg(long)]
        zip: String,

        /// Payment method (`card`, `wallet`)
        #[arg(long, default_value = "card")]
        payment: PaymentMethod,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List all products
    List,
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product to the cart
    Add {
        /// Product id
        product_id: String,

        /// Quantity to add
        #[arg(long, default_value_t = 1)]
        qty: u32,
    },
    /// Remove a product's line from the cart
    Remove {
        /// Product id
        product_id: String,
    },
    /// Set the quantity of an existing line (0 removes it)
    SetQty {
        /// Product id
        product_id: String,

        /// New quantity
        qty: u32,
    },
    /// Show cart lines and total
    List,
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum AuthAction {
    /// Register a new account and log in
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Log in with email and password
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Clear the current session
    Logout,
    /// Show the current session
    Whoami,
    /// Ensure the demo account exists
    SeedDemo,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List the current user's orders, most recent first
    List,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::from_env()?;
    let kv = Arc::new(JsonFileStore::open(config.data_dir.clone())?);
    let mut state = AppState::load(kv, Catalog::demo())?;

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List => commands::catalog::list(&state),
        },
        Commands::Cart { action } => match action {
            CartAction::Add { product_id, qty } => commands::cart::add(&mut state, &product_id, qty)?,
            CartAction::Remove { product_id } => commands::cart::remove(&mut state, &product_id)?,
            CartAction::SetQty { product_id, qty } => {
                commands::cart::set_qty(&mut state, &product_id, qty)?;
            }
            CartAction::List => commands::cart::list(&state),
            CartAction::Clear => commands::cart::clear(&mut state)?,
        },
        Commands::Auth { action } => match action {
            AuthAction::Register {
                name,
                email,
                password,
            } => commands::auth::register(&mut state, &name, &email, &password)?,
            AuthAction::Login { email, password } => {
                commands::auth::login(&mut state, &email, &password)?;
            }
            AuthAction::Logout => commands::auth::logout(&mut state)?,
            AuthAction::Whoami => commands::auth::whoami(&state),
            AuthAction::SeedDemo => commands::auth::seed_demo(&mut state)?,
        },
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(&state),
        },
        Commands::Checkout {
            name,
            email,
            phone,
            address,
            city,
            zip,
            payment,
        } => {
            commands::checkout::run(
                &mut state,
                commands::checkout::CheckoutArgs {
                    name,
                    email,
                    phone,
                    address,
                    city,
                    zip,
                    payment,
                },
            )
            .await?;
        }
    }

    Ok(())
}
