//! Interactive Google sign-in through the system browser.
//!
//! 1. Start `tiny_http` on `127.0.0.1:0` (random port)
//! 2. Open the hosted sign-in page with `redirect_url` and a random `state`
//! 3. Wait for `/callback?id_token=...&state=...` (in `spawn_blocking`, since
//!    `tiny_http::recv` blocks)
//! 4. Verify `state` and hand the Google ID token back to the provider

use std::time::{Duration, Instant};

use crate::error::AuthError;

/// Query parameter names the hosted page may use for the Google ID token.
const TOKEN_PARAM_NAMES: [&str; 2] = ["id_token", "credential"];

/// What a single request to the loopback listener means for the flow.
#[derive(Debug, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Not the callback (favicon, preflight). Answer 204 and keep waiting.
    Ignore,
    /// The callback, but without a token yet (intermediate redirect).
    Waiting,
    /// The Google ID token, with a verified `state`.
    Token(String),
    /// The callback carried a token but the `state` did not match.
    Rejected(String),
}

/// Run the browser flow and return the Google ID token.
///
/// # Errors
///
/// Returns `AuthError::FederatedFlow` if the listener cannot bind (blocked),
/// the callback does not arrive within `timeout` (dismissed), or the `state`
/// does not match.
pub async fn obtain_google_id_token(
    sign_in_url: &str,
    timeout: Duration,
) -> Result<String, AuthError> {
    let server = tiny_http::Server::http("127.0.0.1:0").map_err(|e| {
        AuthError::FederatedFlow(format!("sign-in blocked: failed to bind loopback listener: {e}"))
    })?;
    let port = server
        .server_addr()
        .to_ip()
        .map(|a| a.port())
        .ok_or_else(|| AuthError::FederatedFlow("sign-in blocked: listener has no port".into()))?;

    let state = generate_state()?;
    let redirect_url = format!("http://127.0.0.1:{port}/callback");
    let url = build_sign_in_url(sign_in_url, &redirect_url, &state);

    eprintln!("Opening browser to: {url}");
    if let Err(error) = open::that(&url) {
        tracing::warn!(%error, "failed to open browser");
        eprintln!("Open the URL above manually, then return here.");
    }

    tokio::task::spawn_blocking(move || wait_for_callback(&server, timeout, &state))
        .await
        .map_err(|e| AuthError::FederatedFlow(format!("callback listener stopped: {e}")))?
}

/// Random 16-byte hex nonce for CSRF protection.
fn generate_state() -> Result<String, AuthError> {
    let mut nonce_bytes = [0u8; 16];
    getrandom::fill(&mut nonce_bytes)
        .map_err(|e| AuthError::FederatedFlow(format!("failed to generate state nonce: {e}")))?;
    Ok(nonce_bytes.iter().map(|b| format!("{b:02x}")).collect())
}

/// Append `redirect_url` and `state` to the hosted sign-in page URL.
#[must_use]
pub fn build_sign_in_url(sign_in_url: &str, redirect_url: &str, state: &str) -> String {
    let separator = if sign_in_url.contains('?') { '&' } else { '?' };
    format!(
        "{sign_in_url}{separator}redirect_url={redirect}&state={state}",
        redirect = urlencoding::encode(redirect_url),
        state = urlencoding::encode(state),
    )
}

/// Classify one request path (`/callback?...`) received by the listener.
///
/// # Errors
///
/// Returns `AuthError::FederatedFlow` if a query value is not valid
/// percent-encoding.
pub fn parse_callback(url: &str, expected_state: &str) -> Result<CallbackOutcome, AuthError> {
    let Some(query) = url.strip_prefix("/callback?") else {
        return Ok(CallbackOutcome::Ignore);
    };

    let mut found_token: Option<String> = None;
    let mut found_state: Option<String> = None;
    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let decoded = urlencoding::decode(value)
            .map_err(|e| AuthError::FederatedFlow(format!("URL decode: {e}")))?
            .into_owned();
        if TOKEN_PARAM_NAMES.contains(&key) {
            found_token = Some(decoded);
        } else if key == "state" {
            found_state = Some(decoded);
        }
    }

    Ok(match found_token.filter(|t| !t.is_empty()) {
        Some(token) if found_state.as_deref() == Some(expected_state) => {
            CallbackOutcome::Token(token)
        }
        Some(_) => CallbackOutcome::Rejected("state mismatch, possible CSRF".into()),
        None => CallbackOutcome::Waiting,
    })
}

/// Block until the listener receives the callback or `timeout` elapses.
fn wait_for_callback(
    server: &tiny_http::Server,
    timeout: Duration,
    expected_state: &str,
) -> Result<String, AuthError> {
    let deadline = Instant::now() + timeout;
    let dismissed = || {
        AuthError::FederatedFlow(format!(
            "sign-in dismissed: no callback within {}s",
            timeout.as_secs()
        ))
    };

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(dismissed());
        }

        let request = match server.recv_timeout(remaining) {
            Ok(Some(req)) => req,
            Ok(None) => return Err(dismissed()),
            Err(e) => return Err(AuthError::FederatedFlow(format!("recv error: {e}"))),
        };

        let outcome = match parse_callback(request.url(), expected_state) {
            Ok(outcome) => outcome,
            Err(error) => {
                respond_html(request, "<h1>Sign-in failed</h1><p>Malformed callback.</p>");
                return Err(error);
            }
        };

        match outcome {
            CallbackOutcome::Ignore => {
                let _ = request.respond(tiny_http::Response::from_string("").with_status_code(204));
            }
            CallbackOutcome::Waiting => {
                respond_html(
                    request,
                    "<h1>Waiting for sign-in…</h1><p>Redirecting, please wait.</p>",
                );
            }
            CallbackOutcome::Token(token) => {
                respond_html(request, "<h1>Signed in</h1><p>You can close this tab.</p>");
                return Ok(token);
            }
            CallbackOutcome::Rejected(reason) => {
                respond_html(request, "<h1>Sign-in failed</h1><p>Check the terminal output.</p>");
                return Err(AuthError::FederatedFlow(reason));
            }
        }
    }
}

fn respond_html(request: tiny_http::Request, body: &str) {
    let mut response =
        tiny_http::Response::from_string(format!("<html><body>{body}</body></html>"));
    if let Ok(header) = tiny_http::Header::from_bytes("Content-Type", "text/html; charset=utf-8") {
        response = response.with_header(header);
    }
    let _ = request.respond(response);
}
