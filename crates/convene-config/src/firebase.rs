//! Firebase Authentication configuration.

use serde::{Deserialize, Serialize};

fn default_identity_toolkit_url() -> String {
    String::from("https://identitytoolkit.googleapis.com/v1")
}

fn default_secure_token_url() -> String {
    String::from("https://securetoken.googleapis.com/v1")
}

/// Seconds to wait for the browser to come back from the federated sign-in page.
const fn default_federated_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FirebaseConfig {
    /// Web API key of the Firebase project.
    #[serde(default)]
    pub api_key: String,

    /// Identity Toolkit base URL. Point at the Auth emulator
    /// (`http://127.0.0.1:9099/identitytoolkit.googleapis.com/v1`) for local work.
    #[serde(default = "default_identity_toolkit_url")]
    pub identity_toolkit_url: String,

    /// Secure Token service base URL (ID token refresh).
    #[serde(default = "default_secure_token_url")]
    pub secure_token_url: String,

    /// Hosted page that runs the Google sign-in and redirects back to the
    /// loopback callback with `id_token` and `state`.
    #[serde(default)]
    pub federated_sign_in_url: String,

    #[serde(default = "default_federated_timeout_secs")]
    pub federated_timeout_secs: u64,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            identity_toolkit_url: default_identity_toolkit_url(),
            secure_token_url: default_secure_token_url(),
            federated_sign_in_url: String::new(),
            federated_timeout_secs: default_federated_timeout_secs(),
        }
    }
}

impl FirebaseConfig {
    /// Check if the Firebase config has the minimum required fields.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Google sign-in additionally needs the hosted sign-in page.
    pub fn supports_federated_sign_in(&self) -> bool {
        self.is_configured() && !self.federated_sign_in_url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = FirebaseConfig::default();
        assert!(!config.is_configured());
        assert!(!config.supports_federated_sign_in());
        assert_eq!(config.federated_timeout_secs, 120);
    }

    #[test]
    fn configured_when_api_key_set() {
        let config = FirebaseConfig {
            api_key: "AIzaSyTest".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
        assert!(!config.supports_federated_sign_in());
    }

    #[test]
    fn federated_needs_sign_in_page() {
        let config = FirebaseConfig {
            api_key: "AIzaSyTest".into(),
            federated_sign_in_url: "https://convene.example/cli-sign-in".into(),
            ..Default::default()
        };
        assert!(config.supports_federated_sign_in());
    }
}
