use clap::Subcommand;

use crate::cli::subcommands::{AuthCommands, EventCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Account and session management.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Browse, create, join, and manage events.
    Events {
        #[command(subcommand)]
        action: EventCommands,
    },
}
