use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let confirmation = ctx.api.delete_event(id).await?;
    output(&confirmation, flags.format)
}
