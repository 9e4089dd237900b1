//! # convene-core
//!
//! Core types and error types for Convene.
//!
//! This crate provides the foundational types shared across all Convene crates:
//! - Event records as the remote API serializes them, plus drafts and confirmations
//! - The event category enum
//! - Authenticated identity and the session state machine
//! - The `KeyValueStore` seam shared by the session manager (writer) and the
//!   HTTP client (reader), with an in-memory implementation
//! - The registration password policy
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod password;
pub mod store;

pub use errors::{CoreError, StoreError};
pub use identity::{Identity, Session, SessionSnapshot, SessionState};
pub use store::{KeyValueStore, MemoryStore, TOKEN_KEY};
