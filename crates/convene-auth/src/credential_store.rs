//! Persistent [`KeyValueStore`] backed by the OS keychain with a file fallback.
//!
//! Each key is one keychain entry (`service = keyring_service`, `user = key`)
//! and, when the keychain is unavailable, one file under the store directory
//! (`0700` directory, `0600` files on Unix).

use std::fs;
use std::path::{Path, PathBuf};

use convene_config::StoreConfig;
use convene_core::{KeyValueStore, StoreError, TOKEN_KEY};

use crate::error::AuthError;

/// Read-only override for [`TOKEN_KEY`], for CI and scripted use.
const TOKEN_ENV_OVERRIDE: &str = "CONVENE_AUTH__TOKEN";

#[derive(Debug, Clone)]
pub struct CredentialStore {
    keyring_service: Option<String>,
    dir: PathBuf,
}

impl CredentialStore {
    /// Build the store described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if no directory is configured and the home
    /// directory cannot be determined.
    pub fn from_config(config: &StoreConfig) -> Result<Self, AuthError> {
        let dir = config.resolve_dir().ok_or_else(|| {
            AuthError::Store("home directory not found, cannot store credentials".into())
        })?;
        Ok(Self {
            keyring_service: config.keyring.then(|| config.keyring_service.clone()),
            dir,
        })
    }

    /// A store that never touches the keychain.
    #[must_use]
    pub fn file_only(dir: impl Into<PathBuf>) -> Self {
        Self {
            keyring_service: None,
            dir: dir.into(),
        }
    }

    /// Where the file fallback for `key` lives.
    #[must_use]
    pub fn file_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Detect which tier a value for `key` would be read from.
    #[must_use]
    pub fn detect_source(&self, key: &str) -> Option<&'static str> {
        if self.keyring_get(key).is_some() {
            return Some("keyring");
        }
        if key == TOKEN_KEY && env_token().is_some() {
            return Some("env");
        }
        if load_file(&self.file_path(key)).is_some() {
            return Some("file");
        }
        None
    }

    fn entry(&self, key: &str) -> Option<keyring::Entry> {
        let service = self.keyring_service.as_deref()?;
        match keyring::Entry::new(service, key) {
            Ok(entry) => Some(entry),
            Err(error) => {
                tracing::warn!(%error, key, "keyring unavailable");
                None
            }
        }
    }

    fn keyring_get(&self, key: &str) -> Option<String> {
        self.entry(key)?
            .get_password()
            .ok()
            .filter(|value| !value.is_empty())
    }

    /// Write to the keychain and read the value back through a fresh entry.
    ///
    /// Some platforms accept writes into a non-persistent backend; the
    /// read-back catches that.
    fn keyring_set(&self, key: &str, value: &str) -> bool {
        let Some(entry) = self.entry(key) else {
            return false;
        };
        if let Err(error) = entry.set_password(value) {
            tracing::warn!(%error, key, "keyring store failed; falling back to file");
            return false;
        }
        if self.keyring_get(key).as_deref() == Some(value) {
            true
        } else {
            tracing::warn!(key, "keyring did not retain the value; falling back to file");
            false
        }
    }

    fn store_file(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.file_path(key);
        let write_err = |reason: String| StoreError::Write {
            key: key.to_string(),
            reason,
        };

        fs::create_dir_all(&self.dir)
            .map_err(|e| write_err(format!("mkdir {}: {e}", self.dir.display())))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(&self.dir, fs::Permissions::from_mode(0o700)) {
                tracing::warn!("failed to chmod 0700 {}: {e}", self.dir.display());
            }
        }

        fs::write(&path, value).map_err(|e| write_err(format!("write {}: {e}", path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))
                .map_err(|e| write_err(format!("chmod {}: {e}", path.display())))?;
        }

        Ok(())
    }
}

impl KeyValueStore for CredentialStore {
    /// Priority: keychain → `CONVENE_AUTH__TOKEN` (token key only) → file.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if let Some(value) = self.keyring_get(key) {
            return Ok(Some(value));
        }
        if key == TOKEN_KEY {
            if let Some(token) = env_token() {
                return Ok(Some(token));
            }
        }
        Ok(load_file(&self.file_path(key)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.keyring_set(key, value) {
            return Ok(());
        }
        self.store_file(key, value)
    }

    /// Clears the file fallback first, so a failing keychain still leaves no
    /// file copy behind. A keychain entry that cannot be deleted is an error.
    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.file_path(key);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| StoreError::Remove {
                key: key.to_string(),
                reason: format!("{}: {e}", path.display()),
            })?;
        }

        match self.entry(key) {
            Some(entry) => delete_entry(&entry, key),
            None => Ok(()),
        }
    }
}

/// Delete a keychain entry. An absent entry counts as deleted.
fn delete_entry(entry: &keyring::Entry, key: &str) -> Result<(), StoreError> {
    match entry.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(error) => Err(StoreError::Remove {
            key: key.to_string(),
            reason: format!("keyring: {error}"),
        }),
    }
}

fn env_token() -> Option<String> {
    std::env::var(TOKEN_ENV_OVERRIDE)
        .ok()
        .filter(|token| !token.is_empty())
}

fn load_file(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
