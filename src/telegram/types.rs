//! Wire types for the Telegram Bot API subset the bot uses

use serde::{Deserialize, Serialize};

/// Inbound update from `getUpdates`
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    /// Absent for edits, callbacks and other update kinds we ignore
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    /// Absent for stickers, photos and other non-text messages
    #[serde(default)]
    pub text: Option<String>,
}

impl Message {
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Envelope every Bot API method responds with
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

/// The part of a sent message we care about
#[derive(Debug, Deserialize)]
pub struct SentMessage {
    pub message_id: i64,
}

#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub struct DeleteMessageRequest {
    pub chat_id: i64,
    pub message_id: i64,
}

#[derive(Debug, Serialize)]
pub struct GetUpdatesRequest {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: Vec<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_update() {
        let raw = r#"{
            "update_id": 42,
            "message": {
                "message_id": 7,
                "chat": {"id": 100, "type": "private"},
                "from": {"id": 100, "is_bot": false, "first_name": "Ana"},
                "date": 1700000000,
                "text": "/start"
            }
        }"#;
        let update: Update = serde_json::from_str(raw).unwrap();
        let message = update.message.unwrap();
        assert_eq!(update.update_id, 42);
        assert_eq!(message.chat.id, 100);
        assert_eq!(message.message_id, 7);
        assert_eq!(message.text(), "/start");
    }

    #[test]
    fn test_parse_update_without_message() {
        let raw = r#"{"update_id": 43, "edited_message": {"message_id": 1}}"#;
        let update: Update = serde_json::from_str(raw).unwrap();
        assert!(update.message.is_none());
    }

    #[test]
    fn test_non_text_message_has_empty_text() {
        let raw = r#"{"update_id": 44, "message": {"message_id": 2, "chat": {"id": 5}, "sticker": {}}}"#;
        let update: Update = serde_json::from_str(raw).unwrap();
        assert_eq!(update.message.unwrap().text(), "");
    }

    #[test]
    fn test_parse_envelope_of_non_default_result() {
        let ok: ApiResponse<SentMessage> =
            serde_json::from_str(r#"{"ok": true, "result": {"message_id": 99, "date": 0}}"#)
                .unwrap();
        assert!(ok.ok);
        assert_eq!(ok.result.unwrap().message_id, 99);
        assert!(ok.description.is_none());

        let failed: ApiResponse<SentMessage> =
            serde_json::from_str(r#"{"ok": false, "description": "Forbidden: bot was blocked"}"#)
                .unwrap();
        assert!(failed.result.is_none());
    }

    #[test]
    fn test_parse_error_envelope() {
        let raw = r#"{"ok": false, "error_code": 400, "description": "Bad Request: message to delete not found"}"#;
        let response: ApiResponse<bool> = serde_json::from_str(raw).unwrap();
        assert!(!response.ok);
        assert!(response.result.is_none());
        assert!(response.description.unwrap().contains("not found"));
    }
}
