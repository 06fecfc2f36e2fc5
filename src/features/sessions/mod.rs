//! # Sessions Feature
//!
//! Per-chat started/verified state backing the verification gate.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod store;

pub use store::{ChatSession, InMemorySessionStore, SessionState, SessionStore};
