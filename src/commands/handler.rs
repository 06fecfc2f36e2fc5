//! Command handling for verified chats
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Exhaustive dispatch over [`Command`], no echo fallback

use chrono::{DateTime, Utc};
use log::{debug, error, info};
use std::sync::Arc;

use super::parser::{parse, Command};
use crate::core::{format_duration, truncate_chars, truncate_for_message, ReminderError};
use crate::features::messaging::MessageLifecycle;
use crate::features::reminders::{resolve, Reminder, ReminderStore, Resolution};

pub const HELP_TEXT: &str = "Comandos disponibles:
/start - Iniciar bot
/help - Mostrar ayuda
/status - Ver estado de verificacion
/listar - Ver recordatorios pendientes
/eliminar <id> - Eliminar un recordatorio

Para crear un recordatorio escribe:
Recordar en <N> minutos: <texto>";

pub const USAGE_HINT: &str = "No entendi el mensaje. Para crear un recordatorio escribe:
Recordar en <N> minutos: <texto>
Usa /help para ver todos los comandos.";

pub const UNKNOWN_COMMAND: &str = "Comando no reconocido. Usa /help para ver opciones.";
pub const CANCEL_USAGE: &str = "Uso: /eliminar <id>. Usa /listar para ver los ids.";
pub const NO_PENDING: &str = "No tienes recordatorios pendientes.";

/// Characters of reminder text shown per entry in listings
const PREVIEW_CHARS: usize = 80;
/// Id characters shown when asking the user to disambiguate
const CANDIDATE_ID_CHARS: usize = 8;

/// Executes [`Command`]s for chats that passed the verification gate
#[derive(Clone)]
pub struct CommandHandler {
    store: Arc<dyn ReminderStore>,
    messenger: MessageLifecycle,
}

impl CommandHandler {
    pub fn new(store: Arc<dyn ReminderStore>, messenger: MessageLifecycle) -> Self {
        Self { store, messenger }
    }

    pub async fn handle(&self, chat_id: i64, text: &str) {
        self.handle_at(chat_id, text, Utc::now()).await;
    }

    /// Parse and execute `text` as if received at `now`
    pub async fn handle_at(&self, chat_id: i64, text: &str, now: DateTime<Utc>) {
        let command = parse(text);
        debug!("Chat {chat_id} -> {command:?}");

        let reply = match self.execute(chat_id, command, now).await {
            Ok(reply) => reply,
            Err(e) => Self::reply_for_error(chat_id, &e),
        };
        self.messenger
            .send(chat_id, &truncate_for_message(&reply))
            .await;
    }

    async fn execute(
        &self,
        chat_id: i64,
        command: Command,
        now: DateTime<Utc>,
    ) -> Result<String, ReminderError> {
        match command {
            Command::Remind { minutes, text } => {
                let reminder = self.store.create(chat_id, minutes, &text, now).await?;
                info!(
                    "Created reminder {} for chat {chat_id} due {}",
                    reminder.id, reminder.trigger_time
                );
                Ok(format!(
                    "Recordatorio creado [{}]. Te avisare en {}: {}",
                    reminder.short_id(),
                    format_duration(minutes * 60),
                    reminder.text
                ))
            }
            Command::Help => Ok(HELP_TEXT.to_string()),
            Command::Status => {
                let pending = self.store.query_pending_for(chat_id).await?;
                Ok(format!(
                    "Tu chat esta verificado correctamente.\nRecordatorios pendientes: {}",
                    pending.len()
                ))
            }
            Command::List => {
                let pending = self.store.query_pending_for(chat_id).await?;
                Ok(Self::format_listing(&pending, now))
            }
            Command::Cancel { short_id } => self.cancel(chat_id, &short_id, now).await,
            Command::CancelMissingId => Ok(CANCEL_USAGE.to_string()),
            Command::UnknownCommand(name) => {
                debug!("Unknown command {name} from chat {chat_id}");
                Ok(UNKNOWN_COMMAND.to_string())
            }
            Command::Unrecognized => Ok(USAGE_HINT.to_string()),
        }
    }

    async fn cancel(
        &self,
        chat_id: i64,
        prefix: &str,
        now: DateTime<Utc>,
    ) -> Result<String, ReminderError> {
        let pending = self.store.query_pending_for(chat_id).await?;

        match resolve(&pending, prefix) {
            Resolution::NotFound => Err(ReminderError::NotFound(prefix.to_string())),
            Resolution::Resolved(reminder) => {
                let cancelled = self.store.cancel(&reminder.id, chat_id, now).await?;
                info!("Cancelled reminder {} for chat {chat_id}", cancelled.id);
                Ok(format!(
                    "Recordatorio [{}] eliminado: {}",
                    cancelled.short_id(),
                    truncate_chars(&cancelled.text, PREVIEW_CHARS)
                ))
            }
            Resolution::Ambiguous { candidates, total } => {
                let mut reply = format!(
                    "Hay {total} recordatorios que empiezan con \"{prefix}\". Usa un id mas largo:\n"
                );
                for reminder in &candidates {
                    let longer_id: String = reminder.id.chars().take(CANDIDATE_ID_CHARS).collect();
                    reply.push_str(&format!(
                        "\n[{longer_id}] {}",
                        truncate_chars(&reminder.text, PREVIEW_CHARS)
                    ));
                }
                Ok(reply)
            }
        }
    }

    fn format_listing(pending: &[Reminder], now: DateTime<Utc>) -> String {
        if pending.is_empty() {
            return NO_PENDING.to_string();
        }

        let mut listing = String::from("Tus recordatorios pendientes:\n");
        for reminder in pending {
            let remaining = reminder.trigger_time.signed_duration_since(now).num_seconds();
            let when = if remaining > 0 {
                format!("en {}", format_duration(remaining))
            } else {
                "en cualquier momento".to_string()
            };
            listing.push_str(&format!(
                "\n[{}] {} ({})\n{}\n",
                reminder.short_id(),
                when,
                reminder.trigger_time.format("%d/%m %H:%M UTC"),
                truncate_chars(&reminder.text, PREVIEW_CHARS)
            ));
        }
        listing.push_str("\nUsa /eliminar <id> para eliminar uno.");
        listing
    }

    /// The one place deciding how a failed command is logged and what the user sees
    fn reply_for_error(chat_id: i64, err: &ReminderError) -> String {
        if err.is_validation() {
            debug!("Invalid reminder from chat {chat_id}: {err}");
        } else if let ReminderError::Store(_) = err {
            error!("Reminder store failure for chat {chat_id}: {err}");
        } else {
            debug!("Rejected command from chat {chat_id}: {err}");
        }
        err.user_message()
    }
}
