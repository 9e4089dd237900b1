//! Authenticated identity and the client-side session state machine.
//!
//! ```text
//! unresolved → authenticated
//!            → anonymous
//! authenticated ⇄ anonymous
//! ```
//!
//! `Unresolved` only exists until the identity provider has reported the
//! current user once. Mutating auth operations raise a transient `busy` flag
//! on the published [`SessionSnapshot`]; the durable state is always the one
//! derived from the provider's latest notification.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Provider-issued user identity.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Identity {
    /// Opaque identity reference (Firebase `localId`).
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

/// The current authenticated identity and its bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Session {
    pub identity: Identity,
    /// Most recently issued ID token for `identity`. `None` when the token
    /// could not be fetched after the provider reported the user.
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

/// Where the session lifecycle currently stands.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionState {
    /// No provider notification has been processed yet.
    #[default]
    Unresolved,
    Authenticated(Session),
    /// The provider reported that nobody is signed in.
    Anonymous,
}

impl SessionState {
    /// True once the provider has reported the current user at least once.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }

    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            Self::Unresolved | Self::Anonymous => None,
        }
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.session().map(|session| &session.identity)
    }

    /// Return the string representation used in status output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unresolved => "unresolved",
            Self::Authenticated(_) => "authenticated",
            Self::Anonymous => "anonymous",
        }
    }
}

/// Value published to session subscribers (route guards, status displays).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    /// A register/login/logout call is in flight.
    pub busy: bool,
}
