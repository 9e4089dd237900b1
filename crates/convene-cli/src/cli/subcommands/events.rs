use clap::{Args, Subcommand};
use convene_core::enums::EventType;

/// Event commands. `list` and `show` are public; the rest require a
/// signed-in session.
#[derive(Clone, Debug, Subcommand)]
pub enum EventCommands {
    /// List upcoming events.
    List(EventListArgs),
    /// Show one event.
    Show(EventIdArgs),
    #[command(flatten)]
    Private(PrivateEventCommands),
}

/// Event commands that run behind the session guard.
#[derive(Clone, Debug, Subcommand)]
pub enum PrivateEventCommands {
    /// Create an event as the signed-in user.
    Create(EventCreateArgs),
    /// Update an event you created.
    Update(EventUpdateArgs),
    /// Join an event.
    Join(EventIdArgs),
    /// Events you have joined.
    Joined,
    /// Events you created.
    Mine,
    /// Delete an event you created.
    Delete(EventIdArgs),
}

#[derive(Clone, Debug, Args)]
pub struct EventListArgs {
    /// Community, Education, Health, or Environment.
    #[arg(long = "type")]
    pub event_type: Option<EventType>,
    /// Free-text search.
    #[arg(long, default_value = "")]
    pub search: String,
}

#[derive(Clone, Debug, Args)]
pub struct EventIdArgs {
    pub id: String,
}

#[derive(Clone, Debug, Args)]
pub struct EventCreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: String,
    #[arg(long = "type")]
    pub event_type: EventType,
    #[arg(long)]
    pub location: String,
    /// RFC 3339, `YYYY-MM-DD HH:MM`, or `YYYY-MM-DD` (UTC). Not before today.
    #[arg(long)]
    pub date: String,
    /// Thumbnail image URL.
    #[arg(long, default_value = "")]
    pub thumbnail: String,
}

#[derive(Clone, Debug, Args)]
pub struct EventUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long = "type")]
    pub event_type: Option<EventType>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub thumbnail: Option<String>,
}
