use convene_core::Identity;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::auth::AuthLoginArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthLoginResponse {
    authenticated: bool,
    method: &'static str,
    identity: Identity,
}

pub async fn handle(
    args: &AuthLoginArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let session = ctx.session()?;

    let (method, identity) = if args.google {
        ("google", session.login_with_google().await?)
    } else {
        let email = args
            .email
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("auth login requires --email or --google"))?;
        let password = args
            .password
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("auth login requires --password"))?;
        ("password", session.login(email.trim(), password).await?)
    };

    output(
        &AuthLoginResponse {
            authenticated: true,
            method,
            identity,
        },
        flags.format,
    )
}
