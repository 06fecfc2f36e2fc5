//! Telegram Bot API client over reqwest
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::transport::Transport;
use super::types::{
    ApiResponse, DeleteMessageRequest, GetUpdatesRequest, SendMessageRequest, SentMessage, Update,
};
use crate::core::TransportError;

/// Long-poll window requested from `getUpdates`
pub const LONG_POLL_TIMEOUT_SECS: u64 = 30;

/// Client for the Bot API endpoints the bot needs
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str) -> Result<Self, TransportError> {
        // Must outlive the long-poll window or every idle getUpdates would time out
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(LONG_POLL_TIMEOUT_SECS + 15))
            .build()?;

        Ok(Self {
            http,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        })
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, method);
        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status();

        // Error statuses still carry the JSON envelope with a description
        let envelope: ApiResponse<T> = response.json().await?;
        match (envelope.ok, envelope.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(TransportError::Api(format!(
                "{method} failed ({status}): {}",
                envelope.description.unwrap_or_else(|| "no description".to_string())
            ))),
        }
    }

    /// Fetch pending updates starting at `offset`, blocking up to `timeout_secs`
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TransportError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: vec!["message"],
        };
        let updates: Vec<Update> = self.call("getUpdates", &request).await?;
        if !updates.is_empty() {
            debug!("Received {} updates (offset {offset})", updates.len());
        }
        Ok(updates)
    }
}

#[async_trait]
impl Transport for TelegramClient {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<i64, TransportError> {
        let sent: SentMessage = self
            .call("sendMessage", &SendMessageRequest { chat_id, text })
            .await?;
        Ok(sent.message_id)
    }

    async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), TransportError> {
        let _: bool = self
            .call(
                "deleteMessage",
                &DeleteMessageRequest {
                    chat_id,
                    message_id,
                },
            )
            .await?;
        Ok(())
    }
}
