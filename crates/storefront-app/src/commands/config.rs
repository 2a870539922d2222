//! Configuration management commands.

use anyhow::{bail, Context as _, Result};
use storefront_app::config::{generate_default_config, CONFIG_FILE_NAMES};

use super::{ConfigArgs, ConfigCommand};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    let config = &ctx.config;
    ctx.output.header("Current Configuration");

    ctx.output.info("[api]");
    ctx.output.kv("origin", &config.api.origin);
    ctx.output.kv("base_path", &config.api.base_path);
    ctx.output.kv("cdn_path", &config.api.cdn_path);
    ctx.output.kv("timeout_ms", &config.api.timeout_ms.to_string());
    ctx.output.kv("max_retries", &config.api.max_retries.to_string());

    ctx.output.info("[logging]");
    ctx.output.kv("filter", &config.logging.filter);
    ctx.output.kv("format", &config.logging.format.to_string());

    ctx.output.info("derived");
    ctx.output.kv("api_base_url", &config.api_base_url());
    ctx.output.kv("cdn_base_url", &config.cdn_base_url());
    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let path = ctx.resolve_path(CONFIG_FILE_NAMES[0]);
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    std::fs::write(&path, generate_default_config())
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    ctx.output.success(&format!("Wrote {}", path.display()));
    Ok(())
}
