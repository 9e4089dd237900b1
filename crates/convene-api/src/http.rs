//! Shared response handling for API calls.
//!
//! Maps non-success statuses to [`ApiError::Rejected`] (server `message`
//! first, operation fallback otherwise) and decodes bodies into typed records.

use serde::de::DeserializeOwned;

use crate::error::{ApiError, Operation};

/// Return the response unchanged on success, or [`ApiError::Rejected`].
pub async fn check_response(
    resp: reqwest::Response,
    operation: Operation,
) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message =
        server_message(&body).unwrap_or_else(|| operation.fallback_message().to_string());
    tracing::debug!(%operation, status = status.as_u16(), "request rejected");
    Err(ApiError::Rejected {
        operation,
        status: status.as_u16(),
        message,
    })
}

/// Decode a JSON body into `T`.
pub async fn decode_json<T: DeserializeOwned>(
    resp: reqwest::Response,
    operation: Operation,
) -> Result<T, ApiError> {
    let bytes = read_body(resp, operation).await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
        operation,
        reason: e.to_string(),
    })
}

/// Like [`decode_json`], but an empty body yields `T::default()`.
pub async fn decode_or_default<T: DeserializeOwned + Default>(
    resp: reqwest::Response,
    operation: Operation,
) -> Result<T, ApiError> {
    let bytes = read_body(resp, operation).await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
        operation,
        reason: e.to_string(),
    })
}

async fn read_body(resp: reqwest::Response, operation: Operation) -> Result<Vec<u8>, ApiError> {
    resp.bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|source| ApiError::Transport { operation, source })
}

/// The non-empty `message` field of an error body, if any.
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")?
        .as_str()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
