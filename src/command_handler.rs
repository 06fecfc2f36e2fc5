//! Entry point for every inbound update
//!
//! Runs the verification gate, then hands verified text to the command
//! handler. Each chat gets its own queue drained by one worker task, so a
//! chat's messages are handled one at a time in arrival order while
//! different chats proceed concurrently. A worker retires as soon as its
//! queue is empty.

use dashmap::DashMap;
use log::{debug, error, info};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use crate::commands::CommandHandler;
use crate::features::verification::{GateDecision, VerificationGate};
use crate::telegram::{Message, Update};

#[derive(Clone)]
pub struct UpdateHandler {
    gate: Arc<VerificationGate>,
    commands: CommandHandler,
    chat_queues: Arc<DashMap<i64, UnboundedSender<Message>>>,
}

impl UpdateHandler {
    pub fn new(gate: VerificationGate, commands: CommandHandler) -> Self {
        Self {
            gate: Arc::new(gate),
            commands,
            chat_queues: Arc::new(DashMap::new()),
        }
    }

    /// Queue one update behind earlier updates of the same chat.
    ///
    /// Must be called in arrival order. Updates without a message are a no-op.
    pub fn dispatch(&self, update: Update) {
        let Some(message) = update.message else {
            debug!("Update {} carries no message, skipping", update.update_id);
            return;
        };
        let chat_id = message.chat.id;

        // The entry guard is held across the send so a retiring worker can't
        // drop its receiver between lookup and send.
        let queue = self
            .chat_queues
            .entry(chat_id)
            .or_insert_with(|| self.spawn_chat_worker(chat_id));
        if queue.send(message).is_err() {
            error!("Queue for chat {chat_id} closed, update {} dropped", update.update_id);
        }
    }

    /// Number of chats with queued or in-flight messages
    pub fn active_chats(&self) -> usize {
        self.chat_queues.len()
    }

    fn spawn_chat_worker(&self, chat_id: i64) -> UnboundedSender<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = self.clone();
        tokio::spawn(async move { worker.drain_chat(chat_id, rx).await });
        tx
    }

    async fn drain_chat(self, chat_id: i64, mut rx: UnboundedReceiver<Message>) {
        loop {
            let message = match rx.try_recv() {
                Ok(message) => message,
                Err(TryRecvError::Disconnected) => return,
                Err(TryRecvError::Empty) => {
                    // Retire under the map's lock; a message that slipped in
                    // first keeps the worker alive.
                    let mut late = None;
                    self.chat_queues.remove_if(&chat_id, |_, _| match rx.try_recv() {
                        Ok(message) => {
                            late = Some(message);
                            false
                        }
                        Err(_) => true,
                    });
                    match late {
                        Some(message) => message,
                        None => return,
                    }
                }
            };
            self.handle_isolated(message).await;
        }
    }

    /// Run one message in its own task so a panic is logged, not fatal to the queue
    async fn handle_isolated(&self, message: Message) {
        let chat_id = message.chat.id;
        let message_id = message.message_id;
        let handler = self.clone();
        let task = tokio::spawn(async move {
            handler
                .handle_message(chat_id, message_id, message.text())
                .await
        });
        if let Err(e) = task.await {
            error!("Handler for chat {chat_id} message {message_id} failed: {e}");
        }
    }

    /// Gate then command handling for one message.
    ///
    /// Not serialized on its own; [`dispatch`](Self::dispatch) provides per-chat ordering.
    pub async fn handle_message(&self, chat_id: i64, message_id: i64, text: &str) {
        let request_id = Uuid::new_v4();
        // Content is not logged: unverified chats send passwords
        info!(
            "[{request_id}] 📥 Message received | Chat: {chat_id} | Message: {message_id} | Length: {}",
            text.chars().count()
        );

        match self.gate.handle(chat_id, message_id, text).await {
            GateDecision::Forward => {
                debug!("[{request_id}] Chat {chat_id} verified, dispatching command");
                self.commands.handle(chat_id, text).await;
            }
            GateDecision::Handled => debug!("[{request_id}] Handled by verification gate"),
            GateDecision::Ignored => debug!("[{request_id}] Ignored"),
        }
    }
}
