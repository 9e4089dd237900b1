use convene_core::{Identity, KeyValueStore, TOKEN_KEY};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthStatusResponse {
    state: &'static str,
    identity: Option<Identity>,
    token_present: bool,
    token_source: Option<&'static str>,
    expires_at: Option<String>,
    api_base_url: String,
    note: Option<String>,
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let api_base_url = ctx.config.api.base_url.clone();

    let Ok(session) = ctx.session() else {
        return output(
            &AuthStatusResponse {
                state: "unconfigured",
                identity: None,
                token_present: false,
                token_source: None,
                expires_at: None,
                api_base_url,
                note: Some("CONVENE_FIREBASE__API_KEY not configured".into()),
            },
            flags.format,
        );
    };

    let state = session.wait_until_resolved().await;
    let token = ctx.store.get(TOKEN_KEY)?;

    let (expires_at, note) = match token.as_deref().map(convene_auth::token::decode_expiry) {
        Some(Ok(expires_at)) => (Some(expires_at.to_rfc3339()), None),
        Some(Err(error)) => (None, Some(format!("stored token is unreadable: {error}"))),
        None => (None, None),
    };

    output(
        &AuthStatusResponse {
            state: state.as_str(),
            identity: state.identity().cloned(),
            token_present: token.is_some(),
            token_source: ctx.store.detect_source(TOKEN_KEY),
            expires_at,
            api_base_url,
            note,
        },
        flags.format,
    )
}
