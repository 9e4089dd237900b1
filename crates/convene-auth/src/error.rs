use convene_core::StoreError;
use thiserror::Error;

/// Failures of the session lifecycle. `Display` is the message shown to the user.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The identity provider rejected the request (bad credentials, email in
    /// use, weak password, disabled account, ...).
    #[error("{message}")]
    Provider { code: String, message: String },

    #[error("not signed in, run `convene auth login` first")]
    NotAuthenticated,

    /// The interactive sign-in was dismissed, blocked, or tampered with.
    #[error("federated sign-in failed: {0}")]
    FederatedFlow(String),

    #[error("identity provider is not configured: {0}")]
    NotConfigured(String),

    #[error("credential store error: {0}")]
    Store(String),

    /// The identity provider could not be reached.
    #[error("identity provider unreachable: {0}")]
    Transport(String),

    #[error("{0}")]
    Other(String),
}

impl From<StoreError> for AuthError {
    fn from(error: StoreError) -> Self {
        Self::Store(error.to_string())
    }
}
