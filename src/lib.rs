// Core layer - configuration, errors, reply formatting
pub mod core;

// Features layer - sessions, verification, messaging, reminders
pub mod features;

// Transport layer - Telegram Bot API
pub mod telegram;

// Application layer
pub mod command_handler;
pub mod commands;

pub use core::Config;

pub use features::{
    // Messaging
    MessageLifecycle,
    // Reminders
    InMemoryReminderStore, ReminderScheduler, ReminderStore, SqliteReminderStore,
    // Sessions
    InMemorySessionStore, SessionStore,
    // Verification
    VerificationGate,
};

pub use command_handler::UpdateHandler;
pub use telegram::{TelegramClient, UpdatePoller};
