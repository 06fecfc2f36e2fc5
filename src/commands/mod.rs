//! # Command System
//!
//! Text command parsing and execution for verified chats.
//!
//! - **Version**: 3.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 3.0.0: Closed `Command` enum replaces string dispatch and the handler registry
//! - 1.0.0: Initial command structure

pub mod handler;
pub mod parser;

pub use crate::command_handler::UpdateHandler;
pub use handler::CommandHandler;
pub use parser::{parse, Command};
