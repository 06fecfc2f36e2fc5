//! Per-chat verification state
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Replace process-wide started/verified sets with an injected store

use async_trait::async_trait;
use dashmap::DashMap;

/// Verification state of a single chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatSession {
    pub chat_id: i64,
    pub started: bool,
    /// Always implies `started`
    pub verified: bool,
}

/// Where a chat sits in the `unstarted -> started -> verified` progression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unstarted,
    StartedUnverified,
    Verified,
}

impl SessionState {
    pub fn of(session: Option<&ChatSession>) -> Self {
        match session {
            Some(s) if s.verified => SessionState::Verified,
            Some(s) if s.started => SessionState::StartedUnverified,
            _ => SessionState::Unstarted,
        }
    }
}

/// Storage for chat sessions. Marking is idempotent and never regresses.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, chat_id: i64) -> Option<ChatSession>;

    async fn mark_started(&self, chat_id: i64);

    /// Also marks the chat started so `verified => started` always holds
    async fn mark_verified(&self, chat_id: i64);

    async fn state(&self, chat_id: i64) -> SessionState {
        SessionState::of(self.get(chat_id).await.as_ref())
    }
}

/// Process-lifetime session store; sessions are lost on restart
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<i64, ChatSession>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, chat_id: i64) -> Option<ChatSession> {
        self.sessions.get(&chat_id).map(|s| *s)
    }

    async fn mark_started(&self, chat_id: i64) {
        self.sessions
            .entry(chat_id)
            .or_insert(ChatSession {
                chat_id,
                started: false,
                verified: false,
            })
            .started = true;
    }

    async fn mark_verified(&self, chat_id: i64) {
        let mut entry = self.sessions.entry(chat_id).or_insert(ChatSession {
            chat_id,
            started: false,
            verified: false,
        });
        entry.started = true;
        entry.verified = true;
    }
}
