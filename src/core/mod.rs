//! # Core Module
//!
//! Configuration, error types and reply formatting shared by every feature.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod config;
pub mod error;
pub mod response;

pub use config::{Config, GateTiming};
pub use error::{ReminderError, TransportError};
pub use response::{format_duration, truncate_chars, truncate_for_message, MESSAGE_LIMIT};
