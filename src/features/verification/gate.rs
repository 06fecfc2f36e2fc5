//! Password gate in front of every chat
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! A chat moves `unstarted -> started -> verified` and never back. While a
//! chat is started but unverified every text it sends (except `/start`) is
//! scrubbed shortly afterwards, whether or not it was the right password.

use log::{debug, info};
use std::sync::Arc;

use crate::commands::parser::is_start;
use crate::core::GateTiming;
use crate::features::messaging::MessageLifecycle;
use crate::features::sessions::{SessionState, SessionStore};

pub const WELCOME: &str = "Bienvenido.";
pub const PASSWORD_PROMPT: &str = "Por favor, ingresa la contraseña para continuar:";
pub const ALREADY_VERIFIED: &str = "Ya estas verificado. Puedes usar el bot normalmente.";
pub const PASSWORD_ACCEPTED: &str = "Contraseña correcta. Ahora puedes usar el bot.";
pub const PASSWORD_REJECTED: &str = "Contraseña incorrecta. Ingresa de nuevo la contraseña:";

/// What the caller should do with a message after the gate has seen it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Dropped without any reply or side effect
    Ignored,
    /// Fully handled by the gate
    Handled,
    /// Chat is verified; pass the text on to command handling
    Forward,
}

pub struct VerificationGate {
    sessions: Arc<dyn SessionStore>,
    messenger: MessageLifecycle,
    password: String,
    timing: GateTiming,
}

impl VerificationGate {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        messenger: MessageLifecycle,
        password: impl Into<String>,
        timing: GateTiming,
    ) -> Self {
        Self {
            sessions,
            messenger,
            password: password.into(),
            timing,
        }
    }

    pub async fn handle(&self, chat_id: i64, message_id: i64, text: &str) -> GateDecision {
        if text.is_empty() {
            return GateDecision::Ignored;
        }

        let state = self.sessions.state(chat_id).await;

        if is_start(text) {
            self.handle_start(chat_id, state).await;
            return GateDecision::Handled;
        }

        match state {
            SessionState::Unstarted => {
                debug!("Ignoring message from chat {chat_id} that has not sent /start");
                GateDecision::Ignored
            }
            SessionState::StartedUnverified => {
                // Scrub first so a failed reply never leaves the attempt visible longer
                self.messenger
                    .schedule_delete(chat_id, message_id, self.timing.scrub_delay);
                self.check_password(chat_id, text).await;
                GateDecision::Handled
            }
            SessionState::Verified => GateDecision::Forward,
        }
    }

    async fn handle_start(&self, chat_id: i64, state: SessionState) {
        match state {
            SessionState::Unstarted => {
                self.sessions.mark_started(chat_id).await;
                self.messenger.send(chat_id, WELCOME).await;
                self.messenger
                    .send_transient(chat_id, PASSWORD_PROMPT, self.timing.prompt_ttl)
                    .await;
                info!("Chat {chat_id} started, asking for password");
            }
            SessionState::StartedUnverified => {
                self.messenger
                    .send_transient(chat_id, PASSWORD_PROMPT, self.timing.transient_ttl)
                    .await;
                debug!("Chat {chat_id} not verified yet, prompting again");
            }
            SessionState::Verified => {
                self.messenger.send(chat_id, ALREADY_VERIFIED).await;
                debug!("Chat {chat_id} already verified");
            }
        }
    }

    async fn check_password(&self, chat_id: i64, attempt: &str) {
        if attempt == self.password {
            self.sessions.mark_verified(chat_id).await;
            self.messenger
                .send_transient(chat_id, PASSWORD_ACCEPTED, self.timing.transient_ttl)
                .await;
            info!("Chat {chat_id} verified");
        } else {
            self.messenger
                .send_transient(chat_id, PASSWORD_REJECTED, self.timing.transient_ttl)
                .await;
            info!(
                "Failed password attempt for chat {chat_id} ({} chars)",
                attempt.chars().count()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::sessions::InMemorySessionStore;
    use crate::telegram::testing::RecordingTransport;
    use std::time::Duration;

    const SECRET: &str = "s3cret";
    const CHAT: i64 = 100;

    struct Harness {
        sessions: Arc<InMemorySessionStore>,
        transport: Arc<RecordingTransport>,
        gate: VerificationGate,
    }

    fn harness() -> Harness {
        let sessions = Arc::new(InMemorySessionStore::new());
        let transport = Arc::new(RecordingTransport::new());
        let gate = VerificationGate::new(
            sessions.clone(),
            MessageLifecycle::new(transport.clone()),
            SECRET,
            GateTiming::default(),
        );
        Harness {
            sessions,
            transport,
            gate,
        }
    }

    async fn advance(secs: u64) {
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_text_before_start_is_ignored() {
        let h = harness();

        assert_eq!(h.gate.handle(CHAT, 1, "hola").await, GateDecision::Ignored);
        assert_eq!(h.gate.handle(CHAT, 2, SECRET).await, GateDecision::Ignored);
        advance(10).await;

        assert!(h.sessions.get(CHAT).await.is_none());
        assert!(h.transport.sent().is_empty());
        assert!(h.transport.deleted().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_start_sends_welcome_and_expiring_prompt() {
        let h = harness();

        assert_eq!(h.gate.handle(CHAT, 1, "/start").await, GateDecision::Handled);

        let session = h.sessions.get(CHAT).await.unwrap();
        assert!(session.started && !session.verified);

        let sent = h.transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].text, WELCOME);
        assert_eq!(sent[1].text, PASSWORD_PROMPT);

        // /start itself is never scrubbed; the prompt lives for an hour
        advance(3599).await;
        assert!(h.transport.deleted().is_empty());
        advance(2).await;
        assert_eq!(h.transport.deleted(), vec![(CHAT, sent[1].message_id)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_then_right_password() {
        let h = harness();
        h.gate.handle(CHAT, 1, "/start").await;
        h.transport.clear();

        assert_eq!(h.gate.handle(CHAT, 2, "wrongpass").await, GateDecision::Handled);
        let reply = h.transport.sent().pop().unwrap();
        assert_eq!(reply.text, PASSWORD_REJECTED);
        assert!(!h.sessions.get(CHAT).await.unwrap().verified);

        advance(1).await;
        assert!(!h.transport.was_deleted(CHAT, 2));
        advance(2).await;
        assert!(h.transport.was_deleted(CHAT, 2));
        assert!(h.transport.was_deleted(CHAT, reply.message_id));

        h.transport.clear();
        assert_eq!(h.gate.handle(CHAT, 3, SECRET).await, GateDecision::Handled);
        let confirmation = h.transport.sent().pop().unwrap();
        assert_eq!(confirmation.text, PASSWORD_ACCEPTED);
        assert!(h.sessions.get(CHAT).await.unwrap().verified);

        advance(3).await;
        assert!(h.transport.was_deleted(CHAT, 3));
        assert!(h.transport.was_deleted(CHAT, confirmation.message_id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeat_start_while_unverified_reprompts() {
        let h = harness();
        h.gate.handle(CHAT, 1, "/start").await;
        h.transport.clear();

        h.gate.handle(CHAT, 2, "/start").await;
        let sent = h.transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text, PASSWORD_PROMPT);

        advance(3).await;
        assert!(h.transport.was_deleted(CHAT, sent[0].message_id));
        assert!(!h.transport.was_deleted(CHAT, 2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_after_verification_is_permanent_notice() {
        let h = harness();
        h.gate.handle(CHAT, 1, "/start").await;
        h.gate.handle(CHAT, 2, SECRET).await;
        advance(5000).await;
        h.transport.clear();

        assert_eq!(h.gate.handle(CHAT, 3, "/start").await, GateDecision::Handled);
        let sent = h.transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text, ALREADY_VERIFIED);

        advance(5000).await;
        assert!(h.transport.deleted().is_empty());
        assert!(h.sessions.get(CHAT).await.unwrap().verified);
    }

    #[tokio::test(start_paused = true)]
    async fn test_verified_text_is_forwarded_unscrubbed() {
        let h = harness();
        h.sessions.mark_verified(CHAT).await;

        assert_eq!(h.gate.handle(CHAT, 9, "/listar").await, GateDecision::Forward);
        advance(10).await;
        assert!(h.transport.sent().is_empty());
        assert!(h.transport.deleted().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_text_never_scrubbed() {
        let h = harness();
        h.gate.handle(CHAT, 1, "/start").await;
        h.transport.clear();

        assert_eq!(h.gate.handle(CHAT, 2, "").await, GateDecision::Ignored);
        advance(10).await;
        assert!(h.transport.sent().is_empty());
        assert!(!h.transport.was_deleted(CHAT, 2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scrub_happens_even_if_reply_fails() {
        let h = harness();
        h.gate.handle(CHAT, 1, "/start").await;
        h.transport.set_fail_sends(true);

        h.gate.handle(CHAT, 2, "wrongpass").await;
        advance(3).await;
        assert!(h.transport.was_deleted(CHAT, 2));
    }
}
