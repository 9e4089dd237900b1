use convene_core::Identity;
use convene_core::password;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthRegisterArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthRegisterResponse {
    registered: bool,
    identity: Identity,
}

pub async fn handle(
    args: &AuthRegisterArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    password::check(&args.password)?;
    if args.name.trim().is_empty() {
        anyhow::bail!("auth register: --name must not be empty");
    }

    let identity = ctx
        .session()?
        .register(
            args.email.trim(),
            &args.password,
            args.name.trim(),
            args.photo_url.as_deref(),
        )
        .await?;

    output(
        &AuthRegisterResponse {
            registered: true,
            identity,
        },
        flags.format,
    )
}
