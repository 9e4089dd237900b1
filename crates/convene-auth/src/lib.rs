//! # convene-auth
//!
//! Client-side session lifecycle for Convene.
//!
//! [`SessionManager`] drives registration, password and Google sign-in, and
//! sign-out against an [`IdentityProvider`], publishes the resolved session
//! state, and keeps the provider's ID token in a shared
//! [`convene_core::KeyValueStore`] under [`convene_core::TOKEN_KEY`].
//!
//! [`FirebaseProvider`] talks to Firebase Authentication over REST. The
//! Google flow opens the system browser and receives the credential on a
//! loopback listener (`tiny_http` + `open`). [`CredentialStore`] persists
//! values in the OS keychain (`keyring`) with a file fallback.

pub mod credential_store;
pub mod error;
pub mod federated;
pub mod firebase;
pub mod provider;
pub mod session;
pub mod token;

pub use credential_store::CredentialStore;
pub use error::AuthError;
pub use firebase::FirebaseProvider;
pub use provider::{IdentityProvider, ProfileUpdate};
pub use session::SessionManager;
