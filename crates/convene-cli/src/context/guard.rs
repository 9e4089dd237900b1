use convene_core::{Session, SessionState};

use crate::context::AppContext;

/// Route guard for private commands: wait for the first session
/// notification, then require a signed-in user.
pub async fn require_session(ctx: &AppContext) -> anyhow::Result<Session> {
    let state = ctx.session()?.wait_until_resolved().await;
    authorize(state)
}

fn authorize(state: SessionState) -> anyhow::Result<Session> {
    match state {
        SessionState::Authenticated(session) => Ok(session),
        SessionState::Anonymous | SessionState::Unresolved => {
            anyhow::bail!("sign in first: run `convene auth login`")
        }
    }
}
