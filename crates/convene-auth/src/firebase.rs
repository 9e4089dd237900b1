//! Firebase Authentication over the Identity Toolkit REST API.
//!
//! Credentials (ID token, refresh token, expiry) live in memory. The signed-in
//! user and refresh token are persisted under [`USER_KEY`] so the next
//! [`FirebaseProvider::connect`] restores the session, the way the browser SDK
//! restores from its own persistence before the first state notification.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use convene_config::FirebaseConfig;
use convene_core::{Identity, KeyValueStore};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::AuthError;
use crate::provider::{IdentityProvider, ProfileUpdate};

/// Provider-owned persistence key for the restorable session.
pub const USER_KEY: &str = "firebaseUser";

/// ID tokens are refreshed when they expire within this window.
const REFRESH_BUFFER_SECS: i64 = 300;

/// Lifetime assumed when the service omits `expiresIn`.
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Clone)]
struct Credentials {
    identity: Identity,
    id_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedUser {
    uid: String,
    email: String,
    display_name: Option<String>,
    photo_url: Option<String>,
    refresh_token: String,
}

/// Response shared by `signUp`, `signInWithPassword`, `update`, and `signInWithIdp`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<String>,
}

/// Secure Token service response (snake_case, unlike Identity Toolkit).
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

pub struct FirebaseProvider {
    http: reqwest::Client,
    config: FirebaseConfig,
    store: Arc<dyn KeyValueStore>,
    credentials: Mutex<Option<Credentials>>,
    current: watch::Sender<Option<Identity>>,
}

impl FirebaseProvider {
    /// Build the provider and restore a persisted session, if any.
    ///
    /// Restoration refreshes the ID token. A refresh the service rejects
    /// clears the persisted record and starts signed out.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotConfigured` without an API key and
    /// `AuthError::Transport` if the HTTP client cannot be built.
    pub async fn connect(
        config: FirebaseConfig,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, AuthError> {
        if !config.is_configured() {
            return Err(AuthError::NotConfigured(
                "set CONVENE_FIREBASE__API_KEY or [firebase] api_key".into(),
            ));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("convene/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AuthError::Transport(format!("failed to build HTTP client: {e}")))?;

        let provider = Self {
            http,
            config,
            store,
            credentials: Mutex::new(None),
            current: watch::channel(None).0,
        };
        provider.restore().await;
        Ok(provider)
    }

    /// Identity currently signed in, if any.
    #[must_use]
    pub fn current_identity(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    async fn restore(&self) {
        let raw = match self.store.get(USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(error) => {
                tracing::warn!(%error, "failed to read persisted session; starting signed out");
                return;
            }
        };

        let persisted: PersistedUser = match serde_json::from_str(&raw) {
            Ok(persisted) => persisted,
            Err(error) => {
                tracing::warn!(%error, "persisted session is corrupt; discarding it");
                self.forget_persisted();
                return;
            }
        };

        match self.refresh(&persisted.refresh_token).await {
            Ok(refreshed) => {
                let identity = Identity {
                    uid: persisted.uid,
                    email: persisted.email,
                    display_name: persisted.display_name,
                    photo_url: persisted.photo_url,
                };
                let credentials = Credentials {
                    identity: identity.clone(),
                    id_token: refreshed.id_token,
                    refresh_token: refreshed.refresh_token,
                    expires_at: expiry_from(refreshed.expires_in.as_deref()),
                };
                if self.install(credentials).is_ok() {
                    tracing::debug!(uid = %identity.uid, "restored persisted session");
                    self.current.send_replace(Some(identity));
                }
            }
            Err(error @ AuthError::Provider { .. }) => {
                tracing::warn!(%error, "persisted session was rejected; starting signed out");
                self.forget_persisted();
            }
            Err(error) => {
                tracing::warn!(
                    %error,
                    "persisted session could not be refreshed; keeping it for the next run"
                );
            }
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Credentials>>, AuthError> {
        self.credentials
            .lock()
            .map_err(|e| AuthError::Other(format!("credential state poisoned: {e}")))
    }

    /// Replace the in-memory credentials and persist the restorable record.
    fn install(&self, credentials: Credentials) -> Result<(), AuthError> {
        let persisted = PersistedUser {
            uid: credentials.identity.uid.clone(),
            email: credentials.identity.email.clone(),
            display_name: credentials.identity.display_name.clone(),
            photo_url: credentials.identity.photo_url.clone(),
            refresh_token: credentials.refresh_token.clone(),
        };
        *self.lock()? = Some(credentials);

        match serde_json::to_string(&persisted) {
            Ok(json) => {
                if let Err(error) = self.store.set(USER_KEY, &json) {
                    tracing::warn!(
                        %error,
                        "failed to persist session; it will not survive a restart"
                    );
                }
            }
            Err(error) => tracing::warn!(%error, "failed to serialize session"),
        }
        Ok(())
    }

    fn forget_persisted(&self) {
        if let Err(error) = self.store.remove(USER_KEY) {
            tracing::warn!(%error, "failed to remove persisted session");
        }
    }

    /// Turn a sign-in response into installed credentials and a notification.
    fn establish(&self, response: AccountResponse) -> Result<Identity, AuthError> {
        let id_token = response
            .id_token
            .ok_or_else(|| AuthError::Other("identity provider response missing idToken".into()))?;
        let refresh_token = response.refresh_token.ok_or_else(|| {
            AuthError::Other("identity provider response missing refreshToken".into())
        })?;

        let identity = Identity {
            uid: response.local_id,
            email: response.email.unwrap_or_default(),
            display_name: non_empty(response.display_name),
            photo_url: non_empty(response.photo_url),
        };
        self.install(Credentials {
            identity: identity.clone(),
            id_token,
            refresh_token,
            expires_at: expiry_from(response.expires_in.as_deref()),
        })?;
        self.current.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    fn accounts_url(&self, method: &str) -> String {
        format!(
            "{}/accounts:{method}?key={}",
            self.config.identity_toolkit_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.api_key)
        )
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, AuthError> {
        let url = format!(
            "{}/token?key={}",
            self.config.secure_token_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.api_key)
        );
        self.post(
            &url,
            &serde_json::json!({
                "grant_type": "refresh_token",
                "refresh_token": refresh_token,
            }),
        )
        .await
    }

    async fn post<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<R, AuthError> {
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.without_url().to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(provider_error(status, &body));
        }

        resp.json::<R>()
            .await
            .map_err(|e| AuthError::Other(format!("unexpected identity provider response: {e}")))
    }

    async fn password_call(
        &self,
        method: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, AuthError> {
        let response: AccountResponse = self
            .post(
                &self.accounts_url(method),
                &serde_json::json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;
        self.establish(response)
    }
}

impl IdentityProvider for FirebaseProvider {
    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        self.password_call("signUp", email, password).await
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, AuthError> {
        self.password_call("signInWithPassword", email, password).await
    }

    async fn sign_in_with_google(&self) -> Result<Identity, AuthError> {
        if !self.config.supports_federated_sign_in() {
            return Err(AuthError::NotConfigured(
                "set CONVENE_FIREBASE__FEDERATED_SIGN_IN_URL to enable Google sign-in".into(),
            ));
        }

        let google_token = crate::federated::obtain_google_id_token(
            &self.config.federated_sign_in_url,
            Duration::from_secs(self.config.federated_timeout_secs),
        )
        .await?;

        let response: AccountResponse = self
            .post(
                &self.accounts_url("signInWithIdp"),
                &serde_json::json!({
                    "postBody": format!(
                        "id_token={}&providerId=google.com",
                        urlencoding::encode(&google_token)
                    ),
                    "requestUri": "http://localhost",
                    "returnIdpCredential": true,
                    "returnSecureToken": true,
                }),
            )
            .await?;
        self.establish(response)
    }

    async fn update_profile(
        &self,
        identity: &Identity,
        update: ProfileUpdate,
    ) -> Result<Identity, AuthError> {
        let id_token = self.id_token(identity).await?;

        let mut body = serde_json::json!({
            "idToken": id_token,
            "returnSecureToken": true,
        });
        if let Some(name) = &update.display_name {
            body["displayName"] = serde_json::Value::from(name.as_str());
        }
        if let Some(photo) = &update.photo_url {
            body["photoUrl"] = serde_json::Value::from(photo.as_str());
        }

        let response: AccountResponse = self.post(&self.accounts_url("update"), &body).await?;

        let updated = Identity {
            uid: identity.uid.clone(),
            email: response.email.unwrap_or_else(|| identity.email.clone()),
            display_name: non_empty(response.display_name)
                .or(update.display_name)
                .or_else(|| identity.display_name.clone()),
            photo_url: non_empty(response.photo_url)
                .or(update.photo_url)
                .or_else(|| identity.photo_url.clone()),
        };

        let credentials = {
            let guard = self.lock()?;
            guard
                .as_ref()
                .filter(|c| c.identity.uid == identity.uid)
                .cloned()
                .ok_or(AuthError::NotAuthenticated)?
        };
        let expires_at = response
            .expires_in
            .as_deref()
            .map_or(credentials.expires_at, |secs| expiry_from(Some(secs)));
        self.install(Credentials {
            identity: updated.clone(),
            id_token: response.id_token.unwrap_or(credentials.id_token),
            refresh_token: response.refresh_token.unwrap_or(credentials.refresh_token),
            expires_at,
        })?;
        self.current.send_replace(Some(updated.clone()));
        Ok(updated)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.lock()?.take();
        self.forget_persisted();
        self.current.send_if_modified(|current| current.take().is_some());
        Ok(())
    }

    async fn id_token(&self, identity: &Identity) -> Result<String, AuthError> {
        let credentials = {
            let guard = self.lock()?;
            guard
                .as_ref()
                .filter(|c| c.identity.uid == identity.uid)
                .cloned()
                .ok_or(AuthError::NotAuthenticated)?
        };

        if !crate::token::is_near_expiry(credentials.expires_at, REFRESH_BUFFER_SECS) {
            return Ok(credentials.id_token);
        }

        tracing::debug!(uid = %identity.uid, "refreshing ID token");
        let refreshed = self.refresh(&credentials.refresh_token).await?;
        let id_token = refreshed.id_token.clone();
        self.install(Credentials {
            identity: credentials.identity,
            id_token: refreshed.id_token,
            refresh_token: refreshed.refresh_token,
            expires_at: expiry_from(refreshed.expires_in.as_deref()),
        })?;
        Ok(id_token)
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.current.subscribe()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Expiry instant for an `expiresIn` value. Unparseable or out-of-range
/// lifetimes fall back to the default; negative ones count as already expired.
fn expiry_from(expires_in: Option<&str>) -> DateTime<Utc> {
    let now = Utc::now();
    let secs = expires_in
        .and_then(|s| s.trim().parse::<i64>().ok())
        .map_or(DEFAULT_TOKEN_LIFETIME_SECS, |secs| secs.max(0));
    TimeDelta::try_seconds(secs)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .or_else(|| {
            TimeDelta::try_seconds(DEFAULT_TOKEN_LIFETIME_SECS)
                .and_then(|lifetime| now.checked_add_signed(lifetime))
        })
        .unwrap_or(now)
}

/// Map an Identity Toolkit error body to a user-facing [`AuthError::Provider`].
///
/// The service reports codes like `"EMAIL_EXISTS"` or
/// `"WEAK_PASSWORD : Password should be at least 6 characters"`.
fn provider_error(status: u16, body: &str) -> AuthError {
    let raw = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_default();
    let (code, detail) = match raw.split_once(" : ") {
        Some((code, detail)) => (code.trim().to_string(), Some(detail.trim().to_string())),
        None => (raw.trim().to_string(), None),
    };

    let message = match code.as_str() {
        "EMAIL_EXISTS" => "email already in use".to_string(),
        "WEAK_PASSWORD" => detail.unwrap_or_else(|| "password is too weak".into()),
        "INVALID_EMAIL" => "invalid email address".to_string(),
        "MISSING_PASSWORD" => "password is required".to_string(),
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "invalid email or password".to_string()
        }
        "USER_DISABLED" => "this account has been disabled".to_string(),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "too many attempts, try again later".to_string(),
        "TOKEN_EXPIRED" | "INVALID_ID_TOKEN" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND" => {
            "session expired, sign in again".to_string()
        }
        "OPERATION_NOT_ALLOWED" => "this sign-in method is disabled".to_string(),
        "INVALID_IDP_RESPONSE" => "the Google credential was rejected".to_string(),
        "" => format!("identity provider error (HTTP {status})"),
        other => detail.unwrap_or_else(|| other.to_lowercase().replace('_', " ")),
    };

    AuthError::Provider {
        code: if code.is_empty() { format!("HTTP_{status}") } else { code },
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_code_and_message(status: u16, body: &str) -> (String, String) {
        match provider_error(status, body) {
            AuthError::Provider { code, message } => (code, message),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn maps_email_exists() {
        let (code, message) = provider_code_and_message(
            400,
            r#"{"error":{"code":400,"message":"EMAIL_EXISTS","errors":[]}}"#,
        );
        assert_eq!(code, "EMAIL_EXISTS");
        assert_eq!(message, "email already in use");
    }

    #[test]
    fn weak_password_keeps_service_detail() {
        let (code, message) = provider_code_and_message(
            400,
            r#"{"error":{"code":400,"message":"WEAK_PASSWORD : Password should be at least 6 characters"}}"#,
        );
        assert_eq!(code, "WEAK_PASSWORD");
        assert_eq!(message, "Password should be at least 6 characters");
    }

    #[test]
    fn bad_credentials_share_one_message() {
        for code in ["EMAIL_NOT_FOUND", "INVALID_PASSWORD", "INVALID_LOGIN_CREDENTIALS"] {
            let body = format!(r#"{{"error":{{"code":400,"message":"{code}"}}}}"#);
            let (_, message) = provider_code_and_message(400, &body);
            assert_eq!(message, "invalid email or password");
        }
    }

    #[test]
    fn unknown_code_is_humanized() {
        let (code, message) =
            provider_code_and_message(400, r#"{"error":{"message":"PROJECT_NOT_FOUND"}}"#);
        assert_eq!(code, "PROJECT_NOT_FOUND");
        assert_eq!(message, "project not found");
    }

    #[test]
    fn non_json_body_uses_status() {
        let (code, message) = provider_code_and_message(503, "<html>unavailable</html>");
        assert_eq!(code, "HTTP_503");
        assert_eq!(message, "identity provider error (HTTP 503)");
    }

    #[test]
    fn expiry_defaults_to_an_hour() {
        let expires = expiry_from(None);
        let delta = expires - Utc::now();
        assert!(delta > TimeDelta::seconds(3590) && delta <= TimeDelta::seconds(3600));

        let short = expiry_from(Some("120"));
        assert!(short - Utc::now() <= TimeDelta::seconds(120));
    }

    #[test]
    fn oversized_lifetime_falls_back_to_default() {
        let expires = expiry_from(Some("9223372036854775807"));
        let delta = expires - Utc::now();
        assert!(delta > TimeDelta::seconds(3590) && delta <= TimeDelta::seconds(3600));
    }

    #[test]
    fn negative_lifetime_is_already_expired() {
        let expires = expiry_from(Some("-86400"));
        assert!(expires <= Utc::now());
        assert!(crate::token::is_near_expiry(expires, 0));
    }

    #[test]
    fn blank_profile_fields_are_dropped() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some("Ana".into())).as_deref(), Some("Ana"));
    }

    #[tokio::test]
    async fn connect_requires_api_key() {
        let store: Arc<dyn KeyValueStore> = Arc::new(convene_core::MemoryStore::new());
        let result = FirebaseProvider::connect(FirebaseConfig::default(), store).await;
        assert!(matches!(result, Err(AuthError::NotConfigured(_))));
    }
}
