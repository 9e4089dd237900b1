use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn joined(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let events = ctx.api.joined_events().await?;
    output(&events, flags.format)
}

pub async fn created(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let events = ctx.api.created_events().await?;
    output(&events, flags.format)
}
