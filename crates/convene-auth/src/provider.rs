//! Identity provider contract consumed by the session manager.

use std::future::Future;

use convene_core::Identity;
use tokio::sync::watch;

use crate::error::AuthError;

/// Profile fields to set on an identity. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// External identity provider (Firebase Authentication or a test double).
///
/// Implementations publish the current user on the channel returned by
/// [`IdentityProvider::subscribe`]. The receiver's initial value is the
/// session restored from a previous run (or `None`), and every sign-in,
/// sign-out, and profile change publishes again.
pub trait IdentityProvider: Send + Sync + 'static {
    /// Create an email/password account and sign it in.
    fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity, AuthError>> + Send;

    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Identity, AuthError>> + Send;

    /// Interactive Google sign-in.
    fn sign_in_with_google(&self) -> impl Future<Output = Result<Identity, AuthError>> + Send;

    /// Apply `update` to `identity` and return the updated identity.
    fn update_profile(
        &self,
        identity: &Identity,
        update: ProfileUpdate,
    ) -> impl Future<Output = Result<Identity, AuthError>> + Send;

    /// End the provider session. Succeeds when nobody is signed in.
    fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>> + Send;

    /// A fresh (non-expired) ID token for `identity`.
    fn id_token(&self, identity: &Identity)
    -> impl Future<Output = Result<String, AuthError>> + Send;

    /// Subscribe to session-change notifications.
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}
