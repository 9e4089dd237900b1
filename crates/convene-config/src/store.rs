//! Credential store configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const fn default_keyring() -> bool {
    true
}

fn default_keyring_service() -> String {
    String::from("convene")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Try the OS keychain before the file fallback.
    #[serde(default = "default_keyring")]
    pub keyring: bool,

    /// Keychain service name. Override (e.g. `convene-test`) to keep test runs
    /// away from real credentials.
    #[serde(default = "default_keyring_service")]
    pub keyring_service: String,

    /// Directory for the file fallback. Empty means `~/.convene`.
    #[serde(default)]
    pub dir: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            keyring: default_keyring(),
            keyring_service: default_keyring_service(),
            dir: String::new(),
        }
    }
}

impl StoreConfig {
    /// Resolve the file fallback directory.
    ///
    /// Returns `None` when no directory is configured and the home directory
    /// cannot be determined.
    pub fn resolve_dir(&self) -> Option<PathBuf> {
        if self.dir.is_empty() {
            dirs::home_dir().map(|home| home.join(".convene"))
        } else {
            Some(PathBuf::from(&self.dir))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = StoreConfig::default();
        assert!(config.keyring);
        assert_eq!(config.keyring_service, "convene");
        assert!(config.dir.is_empty());
    }

    #[test]
    fn explicit_dir_wins() {
        let config = StoreConfig {
            dir: "/tmp/convene-creds".into(),
            ..Default::default()
        };
        assert_eq!(config.resolve_dir(), Some(PathBuf::from("/tmp/convene-creds")));
    }
}
