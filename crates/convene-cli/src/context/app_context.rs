use std::sync::Arc;

use anyhow::Context;
use convene_api::ApiClient;
use convene_auth::{AuthError, CredentialStore, FirebaseProvider, SessionManager};
use convene_config::ConveneConfig;
use convene_core::KeyValueStore;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: ConveneConfig,
    pub store: Arc<CredentialStore>,
    pub api: ApiClient,
    session: Option<SessionManager<FirebaseProvider>>,
}

impl AppContext {
    /// Build the credential store, the API client, and (when Firebase is
    /// configured) the identity provider and session manager.
    pub async fn init(config: ConveneConfig) -> anyhow::Result<Self> {
        let store = Arc::new(CredentialStore::from_config(&config.store)?);
        let shared: Arc<dyn KeyValueStore> = store.clone();

        let api = ApiClient::new(&config.api.base_url, Arc::clone(&shared))
            .context("failed to build the events API client")?;

        let session = if config.firebase.is_configured() {
            let provider = FirebaseProvider::connect(config.firebase.clone(), Arc::clone(&shared))
                .await
                .context("failed to connect to the identity provider")?;
            Some(SessionManager::new(Arc::new(provider), shared))
        } else {
            tracing::debug!("firebase not configured; only public commands are available");
            None
        };

        Ok(Self {
            config,
            store,
            api,
            session,
        })
    }

    /// The session manager, or the not-configured error.
    pub fn session(&self) -> anyhow::Result<&SessionManager<FirebaseProvider>> {
        self.session.as_ref().ok_or_else(|| {
            AuthError::NotConfigured(
                "set CONVENE_FIREBASE__API_KEY or [firebase] api_key in config.toml".into(),
            )
            .into()
        })
    }

    /// Drive session-change processing. Never completes while the provider
    /// is alive; pending forever without one.
    pub async fn listen(&self) {
        match &self.session {
            Some(session) => session.listen().await,
            None => std::future::pending().await,
        }
    }
}
