//! List the catalog.

use anyhow::Result;

use super::{CatalogArgs, Session};
use crate::context::Context;

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    let session = Session::open(ctx, args.images)?;

    ctx.output.header("Catalog");
    let count = session.load_catalog(ctx).await?;

    if ctx.output.is_json() {
        ctx.output.json(&session.mediator.catalog().products());
        return Ok(());
    }

    let for_sale = session
        .mediator
        .catalog()
        .products()
        .iter()
        .filter(|p| p.is_for_sale())
        .count();
    ctx.output.success(&format!("{} products, {} for sale", count, for_sale));
    Ok(())
}
