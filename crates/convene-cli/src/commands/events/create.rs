use chrono::Utc;
use convene_core::Session;
use convene_core::entities::NewEvent;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::events::EventCreateArgs;
use crate::commands::events::date::parse_event_date;
use crate::context::AppContext;
use crate::output::output;

pub async fn handle(
    args: &EventCreateArgs,
    session: &Session,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let draft = NewEvent {
        title: required("title", &args.title)?,
        description: required("description", &args.description)?,
        event_type: args.event_type,
        location: required("location", &args.location)?,
        event_date: parse_event_date(&args.date, Utc::now())?,
        thumbnail: args.thumbnail.trim().to_string(),
        creator_email: session.identity.email.clone(),
    };

    let event = ctx.api.create_event(&draft).await?;
    output(&event, flags.format)
}

fn required(field: &str, value: &str) -> anyhow::Result<String> {
    let value = value.trim();
    if value.is_empty() {
        anyhow::bail!("events create: --{field} must not be empty");
    }
    Ok(value.to_string())
}
