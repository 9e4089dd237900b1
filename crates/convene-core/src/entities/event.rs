use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::EventType;

/// A community event as stored by the remote API.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub event_type: EventType,
    pub location: String,
    pub event_date: DateTime<Utc>,
    /// Image URL. The server stores an empty string when none was given.
    #[serde(default)]
    pub thumbnail: String,
    pub creator_email: String,
}

/// Body of `POST /events`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub event_type: EventType,
    pub location: String,
    pub event_date: DateTime<Utc>,
    #[serde(default)]
    pub thumbnail: String,
    pub creator_email: String,
}

/// Body of `PUT /events/:id`. Absent fields are omitted from the JSON body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_email: Option<String>,
}

impl EventUpdate {
    /// True when no field would be sent.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.event_type.is_none()
            && self.location.is_none()
            && self.event_date.is_none()
            && self.thumbnail.is_none()
            && self.creator_email.is_none()
    }
}

impl From<NewEvent> for EventUpdate {
    fn from(event: NewEvent) -> Self {
        Self {
            title: Some(event.title),
            description: Some(event.description),
            event_type: Some(event.event_type),
            location: Some(event.location),
            event_date: Some(event.event_date),
            thumbnail: Some(event.thumbnail),
            creator_email: Some(event.creator_email),
        }
    }
}

/// Body of `POST /events/:id/join`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub user_email: String,
}
