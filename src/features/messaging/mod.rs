//! # Messaging Feature
//!
//! Outbound sends with optional deferred deletion (scrubbing).
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod lifecycle;

pub use lifecycle::MessageLifecycle;
