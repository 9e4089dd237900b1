pub mod auth;
pub mod events;

pub use auth::AuthCommands;
pub use events::{EventCommands, PrivateEventCommands};
