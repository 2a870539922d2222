//! Storefront CLI - drive the storefront checkout from a terminal.
//!
//! Commands:
//! - `storefront catalog` - Load and list the catalog
//! - `storefront checkout` - Put products in the basket and place an order
//! - `storefront config` - Show or create configuration

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{CatalogArgs, CheckoutArgs, ConfigArgs};

/// Storefront CLI - browse the catalog and place orders
#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and list the product catalog
    Catalog(CatalogArgs),

    /// Place an order
    Checkout(CheckoutArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = match context::Context::load(cli.config.as_deref(), output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    if let Err(e) = storefront_app::init_logging(&ctx.config.logging, cli.verbose, cli.json) {
        ctx.output.warn(&e.to_string());
    }

    // The mediator spawns local tasks
    let local = tokio::task::LocalSet::new();
    let result = local
        .run_until(async {
            match cli.command {
                Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
                Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
                Commands::Config(args) => commands::config::run(args, &ctx).await,
            }
        })
        .await;

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
