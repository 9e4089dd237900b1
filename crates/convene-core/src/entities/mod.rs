//! Records exchanged with the remote event API.
//!
//! Field names follow the server's camelCase JSON (`eventType`, `eventDate`,
//! `creatorEmail`, `_id`). All structs derive `Serialize`, `Deserialize`, and
//! `JsonSchema` so server fixtures can be validated against them.

mod confirmation;
mod event;

pub use confirmation::{DeleteConfirmation, JoinConfirmation};
pub use event::{Event, EventUpdate, JoinRequest, NewEvent};
