//! Send-then-maybe-delete message lifecycle
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Deferred deletion moved from detached threads to tokio tasks

use log::{debug, error, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::telegram::Transport;

/// Sends outbound text and schedules best-effort deletions.
///
/// Deletions run as detached tasks: they never block the caller, are
/// attempted exactly once, and failures are only logged.
#[derive(Clone)]
pub struct MessageLifecycle {
    transport: Arc<dyn Transport>,
}

impl MessageLifecycle {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Send a message that stays in the chat
    pub async fn send(&self, chat_id: i64, text: &str) -> Option<i64> {
        self.send_with_ttl(chat_id, text, None).await
    }

    /// Send a message and delete it after `ttl`
    pub async fn send_transient(&self, chat_id: i64, text: &str, ttl: Duration) -> Option<i64> {
        self.send_with_ttl(chat_id, text, Some(ttl)).await
    }

    /// Send `text` to `chat_id`, returning the message id on success.
    ///
    /// `None` means the send failed; callers must not assume delivery.
    pub async fn send_with_ttl(
        &self,
        chat_id: i64,
        text: &str,
        delete_after: Option<Duration>,
    ) -> Option<i64> {
        match self.transport.send_message(chat_id, text).await {
            Ok(message_id) => {
                debug!("Sent message {message_id} to chat {chat_id}");
                if let Some(delay) = delete_after {
                    self.schedule_delete(chat_id, message_id, delay);
                }
                Some(message_id)
            }
            Err(e) => {
                error!("Failed to send message to chat {chat_id}: {e}");
                None
            }
        }
    }

    /// Delete `message_id` from `chat_id` once `delay` has elapsed
    pub fn schedule_delete(&self, chat_id: i64, message_id: i64, delay: Duration) -> JoinHandle<()> {
        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match transport.delete_message(chat_id, message_id).await {
                Ok(()) => debug!("Deleted message {message_id} in chat {chat_id}"),
                Err(e) => warn!("Could not delete message {message_id} in chat {chat_id}: {e}"),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telegram::testing::RecordingTransport;

    fn lifecycle() -> (Arc<RecordingTransport>, MessageLifecycle) {
        let transport = Arc::new(RecordingTransport::new());
        let lifecycle = MessageLifecycle::new(transport.clone());
        (transport, lifecycle)
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_message_is_never_deleted() {
        let (transport, lifecycle) = lifecycle();

        let id = lifecycle.send(1, "hola").await;
        assert!(id.is_some());

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert!(transport.deleted().is_empty());
        assert_eq!(transport.sent_texts(), vec!["hola"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_message_deleted_after_ttl() {
        let (transport, lifecycle) = lifecycle();

        let id = lifecycle
            .send_transient(1, "efimero", Duration::from_secs(2))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!transport.was_deleted(1, id));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(transport.was_deleted(1, id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_failure_returns_none_and_schedules_nothing() {
        let (transport, lifecycle) = lifecycle();
        transport.set_fail_sends(true);

        let id = lifecycle
            .send_transient(1, "perdido", Duration::from_secs(1))
            .await;
        assert!(id.is_none());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(transport.deleted().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_failure_is_abandoned() {
        let (transport, lifecycle) = lifecycle();
        transport.set_fail_deletes(true);

        let handle = lifecycle.schedule_delete(1, 55, Duration::from_secs(2));
        handle.await.unwrap();

        // One attempt, no retry
        transport.set_fail_deletes(false);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(transport.deleted().is_empty());
    }
}
