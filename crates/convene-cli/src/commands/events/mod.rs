mod create;
mod date;
mod delete;
mod join;
mod list;
mod mine;
mod show;
mod update;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{EventCommands, PrivateEventCommands};
use crate::context::{AppContext, require_session};

/// Handle `convene events <subcommand>`.
pub async fn handle(
    action: &EventCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        EventCommands::List(args) => list::handle(args, ctx, flags).await,
        EventCommands::Show(args) => show::handle(&args.id, ctx, flags).await,
        EventCommands::Private(private) => {
            let session = require_session(ctx).await?;
            match private {
                PrivateEventCommands::Create(args) => {
                    create::handle(args, &session, ctx, flags).await
                }
                PrivateEventCommands::Update(args) => update::handle(args, ctx, flags).await,
                PrivateEventCommands::Join(args) => {
                    join::handle(&args.id, &session, ctx, flags).await
                }
                PrivateEventCommands::Joined => mine::joined(ctx, flags).await,
                PrivateEventCommands::Mine => mine::created(ctx, flags).await,
                PrivateEventCommands::Delete(args) => delete::handle(&args.id, ctx, flags).await,
            }
        }
    }
}
