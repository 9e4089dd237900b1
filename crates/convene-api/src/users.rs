//! Events scoped to the signed-in user. The server identifies the user from
//! the bearer token.

use convene_core::entities::Event;
use reqwest::Method;

use crate::ApiClient;
use crate::error::{ApiError, Operation};

impl ApiClient {
    /// `GET /users/me/joined`: events the current user has joined.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on failure, including a 401 when no token is
    /// stored.
    pub async fn joined_events(&self) -> Result<Vec<Event>, ApiError> {
        self.fetch(Operation::ListJoined, Method::GET, "/users/me/joined")
            .await
    }

    /// `GET /users/me/events`: events the current user created.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on failure, including a 401 when no token is
    /// stored.
    pub async fn created_events(&self) -> Result<Vec<Event>, ApiError> {
        self.fetch(Operation::ListCreated, Method::GET, "/users/me/events")
            .await
    }
}
