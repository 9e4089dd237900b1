//! API error types.

use std::fmt;

use thiserror::Error;

/// The remote operation a request belongs to. Each carries the message shown
/// when the server gives no better one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListUpcoming,
    Create,
    Get,
    Update,
    Join,
    ListJoined,
    ListCreated,
    Delete,
}

impl Operation {
    #[must_use]
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::ListUpcoming => "Failed to fetch events",
            Self::Create => "Failed to create event",
            Self::Get => "Failed to fetch event",
            Self::Update => "Failed to update event",
            Self::Join => "Failed to join event",
            Self::ListJoined => "Failed to fetch joined events",
            Self::ListCreated => "Failed to fetch creator events",
            Self::Delete => "Failed to delete event",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ListUpcoming => "list_upcoming",
            Self::Create => "create_event",
            Self::Get => "get_event",
            Self::Update => "update_event",
            Self::Join => "join_event",
            Self::ListJoined => "joined_events",
            Self::ListCreated => "created_events",
            Self::Delete => "delete_event",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`crate::ApiClient`]. `Display` is the single message
/// meant for the user.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status. `message` is the
    /// server's own `message` field, or the operation's fallback.
    #[error("{message}")]
    Rejected {
        operation: Operation,
        status: u16,
        message: String,
    },

    /// The request never got an answer.
    #[error("{}", .operation.fallback_message())]
    Transport {
        operation: Operation,
        source: reqwest::Error,
    },

    /// The body did not match the expected shape.
    #[error("{}", .operation.fallback_message())]
    Decode { operation: Operation, reason: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    #[must_use]
    pub const fn operation(&self) -> Option<Operation> {
        match self {
            Self::Rejected { operation, .. }
            | Self::Transport { operation, .. }
            | Self::Decode { operation, .. } => Some(*operation),
            Self::InvalidRequest(_) => None,
        }
    }

    /// HTTP status of a rejected request.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
