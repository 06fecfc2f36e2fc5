//! Long-polling loop feeding updates to the [`UpdateHandler`]
//!
//! Every fetched update is acknowledged (the offset advances) before it is
//! handled, so a failing or panicking handler never causes redelivery of the
//! same update. Updates are dispatched in batch order, which
//! [`UpdateHandler::dispatch`] preserves per chat.

use log::{info, warn};
use std::time::Duration;

use super::client::{TelegramClient, LONG_POLL_TIMEOUT_SECS};
use super::types::Update;
use crate::command_handler::UpdateHandler;

const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Offset that acknowledges everything in `updates`
pub fn next_offset(current: i64, updates: &[Update]) -> i64 {
    updates
        .iter()
        .map(|u| u.update_id + 1)
        .max()
        .map_or(current, |next| next.max(current))
}

pub struct UpdatePoller {
    client: TelegramClient,
    handler: UpdateHandler,
    offset: i64,
}

impl UpdatePoller {
    pub fn new(client: TelegramClient, handler: UpdateHandler) -> Self {
        Self {
            client,
            handler,
            offset: 0,
        }
    }

    pub async fn run(mut self) {
        info!("Polling for updates (long-poll timeout: {LONG_POLL_TIMEOUT_SECS}s)");

        loop {
            let updates = match self
                .client
                .get_updates(self.offset, LONG_POLL_TIMEOUT_SECS)
                .await
            {
                Ok(updates) => updates,
                Err(e) => {
                    warn!("getUpdates failed: {e}; retrying in {}s", RETRY_DELAY.as_secs());
                    tokio::time::sleep(RETRY_DELAY).await;
                    continue;
                }
            };

            self.offset = next_offset(self.offset, &updates);

            for update in updates {
                self.handler.dispatch(update);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn updates(ids: &[i64]) -> Vec<Update> {
        ids.iter()
            .map(|id| serde_json::from_str(&format!(r#"{{"update_id": {id}}}"#)).unwrap())
            .collect()
    }

    #[test]
    fn test_next_offset_acknowledges_highest() {
        assert_eq!(next_offset(0, &updates(&[10, 12, 11])), 13);
    }

    #[test]
    fn test_next_offset_unchanged_when_empty() {
        assert_eq!(next_offset(40, &[]), 40);
    }

    #[test]
    fn test_next_offset_never_moves_back() {
        assert_eq!(next_offset(50, &updates(&[3])), 50);
    }
}
