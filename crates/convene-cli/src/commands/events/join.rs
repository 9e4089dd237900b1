use convene_core::Session;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(
    id: &str,
    session: &Session,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let confirmation = ctx.api.join_event(id, &session.identity.email).await?;
    output(&confirmation, flags.format)
}
