//! Event categories.
//!
//! Serialized exactly as the remote API stores them (`"Community"`,
//! `"Education"`, `"Health"`, `"Environment"`). Parsing from user input is
//! case-insensitive.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// EventType
// ---------------------------------------------------------------------------

/// Category of a community event.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum EventType {
    #[default]
    Community,
    Education,
    Health,
    Environment,
}

impl EventType {
    /// Every category, in the order the create form offers them.
    pub const ALL: [Self; 4] = [
        Self::Community,
        Self::Education,
        Self::Health,
        Self::Environment,
    ];

    /// Return the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Community => "Community",
            Self::Education => "Education",
            Self::Health => "Health",
            Self::Environment => "Environment",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::Parse {
                field: "event type".into(),
                reason: format!(
                    "'{trimmed}' is not one of {}",
                    Self::ALL.map(Self::as_str).join(", ")
                ),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_server_capitalization() {
        let json = serde_json::to_string(&EventType::Environment).unwrap();
        assert_eq!(json, "\"Environment\"");
    }

    #[test]
    fn rejects_unknown_wire_value() {
        let parsed: Result<EventType, _> = serde_json::from_str("\"Sports\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("health".parse::<EventType>().unwrap(), EventType::Health);
        assert_eq!(" EDUCATION ".parse::<EventType>().unwrap(), EventType::Education);
    }

    #[test]
    fn parse_error_lists_choices() {
        let err = "sports".parse::<EventType>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'sports'"));
        assert!(message.contains("Community, Education, Health, Environment"));
    }

    #[test]
    fn default_matches_create_form() {
        assert_eq!(EventType::default(), EventType::Community);
    }
}
