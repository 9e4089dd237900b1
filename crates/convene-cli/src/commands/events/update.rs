use chrono::Utc;
use convene_core::entities::EventUpdate;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::events::EventUpdateArgs;
use crate::commands::events::date::parse_event_date;
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(
    args: &EventUpdateArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let update = build_update(args)?;
    let event = ctx.api.update_event(&args.id, &update).await?;
    output(&event, flags.format)
}

fn build_update(args: &EventUpdateArgs) -> anyhow::Result<EventUpdate> {
    let trimmed = |value: &Option<String>| value.as_deref().map(|v| v.trim().to_string());

    let update = EventUpdate {
        title: trimmed(&args.title),
        description: trimmed(&args.description),
        event_type: args.event_type,
        location: trimmed(&args.location),
        event_date: args
            .date
            .as_deref()
            .map(|date| parse_event_date(date, Utc::now()))
            .transpose()?,
        thumbnail: trimmed(&args.thumbnail),
        creator_email: None,
    };

    if update.is_empty() {
        anyhow::bail!(
            "nothing to update: pass at least one of \
             --title, --description, --type, --location, --date, --thumbnail"
        );
    }
    Ok(update)
}
