//! Outbound transport seam
//!
//! The bot only ever needs two operations from the messaging platform: send a
//! text and delete a message. Everything above this trait is platform-agnostic.

use async_trait::async_trait;

use crate::core::TransportError;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `text` to `chat_id`, returning the platform-assigned message id
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<i64, TransportError>;

    /// Delete a previously sent (or received) message
    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), TransportError>;
}
