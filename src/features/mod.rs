//! # Features Layer
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

pub mod messaging;
pub mod reminders;
pub mod sessions;
pub mod verification;

pub use messaging::MessageLifecycle;
pub use reminders::{
    InMemoryReminderStore, Reminder, ReminderScheduler, ReminderStatus, ReminderStore,
    SqliteReminderStore,
};
pub use sessions::{ChatSession, InMemorySessionStore, SessionStore};
pub use verification::{GateDecision, VerificationGate};
