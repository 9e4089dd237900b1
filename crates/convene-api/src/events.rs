//! Event operations: listing, creation, lookup, update, join, and deletion.

use convene_core::entities::{
    DeleteConfirmation, Event, EventUpdate, JoinConfirmation, JoinRequest, NewEvent,
};
use convene_core::enums::EventType;
use reqwest::Method;

use crate::error::{ApiError, Operation};
use crate::{ApiClient, http, segment};

/// Filters for [`ApiClient::list_upcoming`]. Both are always sent; unset
/// values go out empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    pub event_type: Option<EventType>,
    pub search: String,
}

impl EventQuery {
    #[must_use]
    pub fn new(event_type: Option<EventType>, search: impl Into<String>) -> Self {
        Self {
            event_type,
            search: search.into(),
        }
    }

    fn to_query_string(&self) -> String {
        format!(
            "type={}&search={}",
            self.event_type.map_or("", EventType::as_str),
            urlencoding::encode(&self.search)
        )
    }
}

impl ApiClient {
    /// `GET /events?type=&search=`. The server's list is returned as is.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, a non-success status, or a
    /// body that is not a list of events.
    pub async fn list_upcoming(&self, query: &EventQuery) -> Result<Vec<Event>, ApiError> {
        let path = format!("/events?{}", query.to_query_string());
        self.fetch(Operation::ListUpcoming, Method::GET, &path).await
    }

    /// `POST /events`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the server rejects the event or the response
    /// is not an event.
    pub async fn create_event(&self, event: &NewEvent) -> Result<Event, ApiError> {
        self.send(Operation::Create, Method::POST, "/events", event).await
    }

    /// `GET /events/:id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`]; a missing event surfaces as
    /// [`ApiError::Rejected`] with status 404.
    pub async fn get_event(&self, id: &str) -> Result<Event, ApiError> {
        let path = format!("/events/{}", segment(id)?);
        self.fetch(Operation::Get, Method::GET, &path).await
    }

    /// `PUT /events/:id`. Fields left `None` are omitted from the body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the server rejects the update or the response
    /// is not an event.
    pub async fn update_event(&self, id: &str, update: &EventUpdate) -> Result<Event, ApiError> {
        let path = format!("/events/{}", segment(id)?);
        self.send(Operation::Update, Method::PUT, &path, update).await
    }

    /// `POST /events/:id/join` with `{ "userEmail": ... }`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the server refuses the join.
    pub async fn join_event(
        &self,
        id: &str,
        user_email: &str,
    ) -> Result<JoinConfirmation, ApiError> {
        let path = format!("/events/{}/join", segment(id)?);
        let body = JoinRequest {
            user_email: user_email.to_string(),
        };
        let request = self.prepare(Method::POST, &path, Some(&body))?;
        let resp = self.dispatch(request, Operation::Join).await?;
        http::decode_or_default(resp, Operation::Join).await
    }

    /// `DELETE /events/:id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the server refuses the deletion.
    pub async fn delete_event(&self, id: &str) -> Result<DeleteConfirmation, ApiError> {
        let path = format!("/events/{}", segment(id)?);
        let request = self.prepare::<()>(Method::DELETE, &path, None)?;
        let resp = self.dispatch(request, Operation::Delete).await?;
        http::decode_or_default(resp, Operation::Delete).await
    }
}
