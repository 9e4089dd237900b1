//! Client-side session lifecycle.
//!
//! [`SessionManager`] wraps an [`IdentityProvider`], republishes the provider's
//! ID token under [`TOKEN_KEY`] in the shared store, and publishes a
//! [`SessionSnapshot`] that route guards subscribe to.
//!
//! The durable state only changes in [`SessionManager::apply`], which runs for
//! every provider notification. Mutating operations raise `busy` for their
//! duration and persist the token they obtained, but they never set the state
//! themselves: the provider's own confirmation decides it.

use std::sync::Arc;

use convene_core::{Identity, KeyValueStore, Session, SessionSnapshot, SessionState, TOKEN_KEY};
use tokio::sync::watch;

use crate::error::AuthError;
use crate::provider::{IdentityProvider, ProfileUpdate};

pub struct SessionManager<P> {
    provider: Arc<P>,
    store: Arc<dyn KeyValueStore>,
    snapshot: watch::Sender<SessionSnapshot>,
}

/// Raises `busy` on creation and lowers it on every exit path.
struct BusyGuard<'a> {
    snapshot: &'a watch::Sender<SessionSnapshot>,
}

impl<'a> BusyGuard<'a> {
    fn raise(snapshot: &'a watch::Sender<SessionSnapshot>) -> Self {
        snapshot.send_modify(|s| s.busy = true);
        Self { snapshot }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.snapshot.send_modify(|s| s.busy = false);
    }
}

impl<P: IdentityProvider> SessionManager<P> {
    /// Create a manager in the `Unresolved` state. Nothing is processed until
    /// [`Self::listen`] (or [`Self::apply`]) runs.
    pub fn new(provider: Arc<P>, store: Arc<dyn KeyValueStore>) -> Self {
        let (snapshot, _) = watch::channel(SessionSnapshot::default());
        Self {
            provider,
            store,
            snapshot,
        }
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Current published value.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.subscribe()
    }

    /// Wait until the first provider notification has been processed.
    pub async fn wait_until_resolved(&self) -> SessionState {
        let mut updates = self.subscribe();
        match updates.wait_for(|s| s.state.is_resolved()).await {
            Ok(snapshot) => snapshot.state.clone(),
            // The sender lives in `self`, so the channel cannot close here.
            Err(_) => self.snapshot().state,
        }
    }

    /// Create an account, set its display name (and photo, when given),
    /// persist its token, and return the updated identity.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if the provider rejects the account or the
    /// profile update, or the token cannot be fetched or stored.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
        photo_url: Option<&str>,
    ) -> Result<Identity, AuthError> {
        let _busy = BusyGuard::raise(&self.snapshot);

        let created = self.provider.create_account(email, password).await?;
        let update = ProfileUpdate {
            display_name: Some(display_name.to_string()),
            photo_url: photo_url
                .filter(|url| !url.trim().is_empty())
                .map(str::to_string),
        };
        let identity = self.provider.update_profile(&created, update).await?;
        self.persist_token(&identity).await?;

        tracing::debug!(uid = %identity.uid, "registered account");
        Ok(identity)
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] on invalid credentials, provider unavailability,
    /// or a token store failure. Nothing is written on failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let _busy = BusyGuard::raise(&self.snapshot);

        let identity = self.provider.sign_in_with_password(email, password).await?;
        self.persist_token(&identity).await?;

        tracing::debug!(uid = %identity.uid, "signed in with password");
        Ok(identity)
    }

    /// Sign in through the interactive Google flow.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if the flow is dismissed or blocked, or the
    /// provider rejects the credential.
    pub async fn login_with_google(&self) -> Result<Identity, AuthError> {
        let _busy = BusyGuard::raise(&self.snapshot);

        let identity = self.provider.sign_in_with_google().await?;
        self.persist_token(&identity).await?;

        tracing::debug!(uid = %identity.uid, "signed in with google");
        Ok(identity)
    }

    /// End the provider session and remove the stored token. Succeeds when
    /// nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if the provider or the token store fails.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let _busy = BusyGuard::raise(&self.snapshot);

        self.provider.sign_out().await?;
        self.store.remove(TOKEN_KEY)?;

        tracing::debug!("signed out");
        Ok(())
    }

    /// Process provider notifications until the provider closes its channel.
    ///
    /// The current value is processed immediately, so the state is resolved
    /// as soon as the first iteration completes. Notifications that arrive
    /// while one is being processed coalesce to the latest.
    pub async fn listen(&self) {
        let mut changes = self.provider.subscribe();
        loop {
            let current = changes.borrow_and_update().clone();
            self.apply(current).await;
            if changes.changed().await.is_err() {
                tracing::debug!("identity provider closed its notification channel");
                break;
            }
        }
    }

    /// Process one provider notification.
    ///
    /// A reported user gets a fresh token persisted; no user removes the
    /// stored token. Either way the published state becomes resolved.
    pub async fn apply(&self, change: Option<Identity>) {
        let state = match change {
            Some(identity) => {
                let token = self.refresh_stored_token(&identity).await;
                SessionState::Authenticated(Session { identity, token })
            }
            None => {
                if let Err(error) = self.store.remove(TOKEN_KEY) {
                    tracing::warn!(%error, "failed to clear stored token after sign-out");
                }
                SessionState::Anonymous
            }
        };

        tracing::debug!(state = state.as_str(), "session state changed");
        self.snapshot.send_modify(|s| s.state = state);
    }

    async fn refresh_stored_token(&self, identity: &Identity) -> Option<String> {
        match self.provider.id_token(identity).await {
            Ok(token) => {
                if let Err(error) = self.store.set(TOKEN_KEY, &token) {
                    tracing::warn!(
                        %error,
                        uid = %identity.uid,
                        "failed to persist refreshed token"
                    );
                }
                Some(token)
            }
            Err(error) => {
                tracing::warn!(
                    %error,
                    uid = %identity.uid,
                    "failed to fetch ID token after session change"
                );
                if let Err(error) = self.store.remove(TOKEN_KEY) {
                    tracing::warn!(%error, "failed to clear stale token");
                }
                None
            }
        }
    }

    async fn persist_token(&self, identity: &Identity) -> Result<(), AuthError> {
        let token = self.provider.id_token(identity).await?;
        self.store.set(TOKEN_KEY, &token)?;
        Ok(())
    }
}
