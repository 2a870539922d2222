//! CLI command implementations.

pub mod catalog;
pub mod checkout;
pub mod config;

use std::rc::Rc;

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use storefront_app::{CheckoutMediator, Renderer, TextRenderer, ViewBinding};
use storefront_data::HttpCommerceApi;
use storefront_events::Broker;

use crate::context::Context;

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    /// Show product image URLs.
    #[arg(long)]
    pub images: bool,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Product id to put in the basket (repeatable).
    #[arg(short, long = "product", required = true)]
    pub products: Vec<String>,

    /// Delivery address.
    #[arg(short, long)]
    pub address: Option<String>,

    /// Payment method: online or cash.
    #[arg(long)]
    pub payment: Option<String>,

    /// Contact email.
    #[arg(short, long)]
    pub email: Option<String>,

    /// Contact phone.
    #[arg(long)]
    pub phone: Option<String>,

    /// Never prompt; fail when a field is missing or invalid.
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a default storefront.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// A mediator wired to the HTTP API, with terminal views attached.
pub struct Session {
    pub mediator: Rc<CheckoutMediator>,
    pub renderer: Rc<dyn Renderer>,
    _views: Option<ViewBinding>,
}

impl Session {
    pub fn open(ctx: &Context, show_images: bool) -> Result<Self> {
        let api = HttpCommerceApi::new(ctx.config.api_base_url(), ctx.config.timeout())
            .context("Failed to create API client")?
            .with_retry(ctx.config.retry_policy());
        ctx.output.debug(&format!("API base URL: {}", api.base_url()));

        let broker = Broker::shared();
        let mediator = CheckoutMediator::new(Rc::clone(&broker), Rc::new(api));

        let renderer: Rc<dyn Renderer> =
            Rc::new(TextRenderer::new(ctx.config.cdn_base_url()).with_images(show_images));
        let views = if ctx.output.is_json() {
            None
        } else {
            let output = ctx.output.clone();
            Some(ViewBinding::bind(
                &broker,
                Rc::clone(&renderer),
                Rc::new(move |view: String| output.view(&view)),
            ))
        };

        Ok(Self {
            mediator,
            renderer,
            _views: views,
        })
    }

    /// Load the catalog behind a spinner.
    pub async fn load_catalog(&self, ctx: &Context) -> Result<usize> {
        let spinner = ctx.output.spinner("Loading catalog...");
        let loaded = self.mediator.load_catalog().await;
        spinner.finish_and_clear();
        loaded.context("Failed to load the catalog")
    }
}
