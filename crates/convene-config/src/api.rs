//! Remote event API configuration.

use serde::{Deserialize, Serialize};

/// Default API endpoint (the event server's development port).
fn default_base_url() -> String {
    String::from("http://localhost:5000")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base endpoint every request path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl ApiConfig {
    /// Check that the base URL is an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), crate::ConfigError> {
        let url = self.base_url.trim();
        if url.starts_with("http://") || url.starts_with("https://") {
            Ok(())
        } else {
            Err(crate::ConfigError::InvalidValue {
                field: "api.base_url".into(),
                reason: format!("'{url}' is not an http(s) URL"),
            })
        }
    }
}
