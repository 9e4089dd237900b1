use convene_api::EventQuery;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::events::EventListArgs;
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(
    args: &EventListArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let query = EventQuery::new(args.event_type, args.search.trim());
    let events = ctx.api.list_upcoming(&query).await?;
    output(&events, flags.format)
}
