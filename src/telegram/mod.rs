//! # Telegram Transport
//!
//! Bot API client, wire types and the long-polling update loop.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod client;
pub mod transport;
pub mod types;
pub mod updates;

#[cfg(test)]
pub use transport::testing;

pub use client::TelegramClient;
pub use transport::Transport;
pub use types::{Message, Update};
pub use updates::UpdatePoller;
