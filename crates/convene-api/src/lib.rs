//! # convene-api
//!
//! Authenticated HTTP client for the Convene events API.
//!
//! Every request is built by [`ApiClient::prepare`], which reads the current
//! ID token from the shared [`KeyValueStore`] and attaches it as a bearer
//! credential. Operations live in [`events`] and [`users`].

pub mod events;
pub mod users;

mod error;
mod http;

pub use error::{ApiError, Operation};
pub use events::EventQuery;

use std::sync::Arc;

use convene_core::{KeyValueStore, TOKEN_KEY};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// HTTP client for the events API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    store: Arc<dyn KeyValueStore>,
}

impl ApiClient {
    /// Create a client for `base_url` that reads its credential from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if `base_url` is not an absolute
    /// http(s) URL or the HTTP client cannot be built.
    pub fn new(base_url: &str, store: Arc<dyn KeyValueStore>) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidRequest(format!("invalid base URL {base_url}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidRequest(format!(
                "unsupported base URL scheme: {}",
                base_url.scheme()
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("convene/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            store,
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the outgoing request for `path_and_query` (which starts with `/`
    /// and is already percent-encoded) without sending it.
    ///
    /// The request always carries `Content-Type: application/json`. When the
    /// store holds a token it also carries exactly one
    /// `Authorization: Bearer <token>` header; otherwise none.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if the URL cannot be formed, the
    /// body cannot be serialized, or the stored token is not a valid header
    /// value.
    pub fn prepare<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Request, ApiError> {
        let url = self.endpoint(path_and_query)?;

        let mut builder = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let mut request = builder
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        if let Some(token) = self.current_token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                ApiError::InvalidRequest("stored token is not a valid header value".into())
            })?;
            value.set_sensitive(true);
            request.headers_mut().remove(AUTHORIZATION);
            request.headers_mut().insert(AUTHORIZATION, value);
        }

        Ok(request)
    }

    fn endpoint(&self, path_and_query: &str) -> Result<Url, ApiError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let raw = format!("{base}/{}", path_and_query.trim_start_matches('/'));
        Url::parse(&raw).map_err(|e| ApiError::InvalidRequest(format!("invalid URL {raw}: {e}")))
    }

    fn current_token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(error) => {
                tracing::warn!(%error, "failed to read stored token; sending request without it");
                None
            }
        }
    }

    async fn dispatch(
        &self,
        request: reqwest::Request,
        operation: Operation,
    ) -> Result<reqwest::Response, ApiError> {
        tracing::debug!(
            %operation,
            method = %request.method(),
            url = %request.url(),
            authenticated = request.headers().contains_key(AUTHORIZATION),
            "dispatching request"
        );
        let resp = self
            .http
            .execute(request)
            .await
            .map_err(|source| ApiError::Transport { operation, source })?;
        http::check_response(resp, operation).await
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        operation: Operation,
        method: Method,
        path_and_query: &str,
    ) -> Result<T, ApiError> {
        let request = self.prepare::<()>(method, path_and_query, None)?;
        let resp = self.dispatch(request, operation).await?;
        http::decode_json(resp, operation).await
    }

    async fn send<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        operation: Operation,
        method: Method,
        path_and_query: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.prepare(method, path_and_query, Some(body))?;
        let resp = self.dispatch(request, operation).await?;
        http::decode_json(resp, operation).await
    }
}

/// Percent-encode one path segment, rejecting blanks.
fn segment(id: &str) -> Result<String, ApiError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiError::InvalidRequest("event id must not be empty".into()));
    }
    Ok(urlencoding::encode(id).into_owned())
}

#[cfg(test)]
mod tests {
    use convene_core::{MemoryStore, StoreError};
    use pretty_assertions::assert_eq;

    use super::*;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable(format!("cannot read {key}")))
        }
        fn set(&self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable(format!("cannot write {key}")))
        }
        fn remove(&self, key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable(format!("cannot remove {key}")))
        }
    }

    fn client(store: Arc<dyn KeyValueStore>) -> ApiClient {
        ApiClient::new("http://localhost:5000", store).unwrap()
    }

    #[test]
    fn token_is_attached_once() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "abc.def.ghi").unwrap();
        let request = client(store)
            .prepare::<()>(Method::GET, "/events/e1", None)
            .unwrap();

        let auth: Vec<_> = request.headers().get_all(AUTHORIZATION).iter().collect();
        assert_eq!(auth.len(), 1);
        assert_eq!(auth[0], "Bearer abc.def.ghi");
        assert!(auth[0].is_sensitive());
        assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn no_token_no_authorization() {
        let request = client(Arc::new(MemoryStore::new()))
            .prepare::<()>(Method::GET, "/events", None)
            .unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
        assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn removed_token_is_not_sent() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "abc").unwrap();
        let api = client(store.clone());
        store.remove(TOKEN_KEY).unwrap();

        let request = api.prepare::<()>(Method::GET, "/users/me/joined", None).unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn unreadable_store_sends_anonymously() {
        let request = client(Arc::new(BrokenStore))
            .prepare::<()>(Method::GET, "/events", None)
            .unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn token_with_newline_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "abc\ndef").unwrap();
        let err = client(store)
            .prepare::<()>(Method::GET, "/events", None)
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let api = ApiClient::new("https://api.example.com/v2/", Arc::new(MemoryStore::new()))
            .unwrap();
        let request = api
            .prepare::<()>(Method::DELETE, "/events/e1", None)
            .unwrap();
        assert_eq!(request.url().as_str(), "https://api.example.com/v2/events/e1");
        assert_eq!(request.method(), Method::DELETE);
    }

    #[test]
    fn body_is_json() {
        let body = serde_json::json!({"userEmail": "a@b.com"});
        let request = client(Arc::new(MemoryStore::new()))
            .prepare(Method::POST, "/events/e1/join", Some(&body))
            .unwrap();
        let bytes = request.body().and_then(reqwest::Body::as_bytes).unwrap();
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(bytes).unwrap(),
            body
        );
        assert_eq!(request.headers().get_all(CONTENT_TYPE).iter().count(), 1);
    }

    #[test]
    fn rejects_non_http_base() {
        assert!(ApiClient::new("ftp://example.com", Arc::new(MemoryStore::new())).is_err());
        assert!(ApiClient::new("not a url", Arc::new(MemoryStore::new())).is_err());
    }

    #[test]
    fn segments_are_encoded() {
        assert_eq!(segment("a b/c").unwrap(), "a%20b%2Fc");
        assert!(segment("  ").is_err());
    }
}
