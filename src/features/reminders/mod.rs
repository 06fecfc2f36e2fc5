//! # Reminders Feature
//!
//! Durable one-shot reminders: validated creation, short-id lookup, and a
//! polling scheduler that delivers them when due.
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Store abstraction with SQLite and in-memory backends, soft-delete via status
//! - 1.0.0: Initial release with polling scheduler

pub mod model;
pub mod scheduler;
pub mod short_id;
pub mod sqlite_store;
pub mod store;

pub use model::{Reminder, ReminderDraft, ReminderStatus, MAX_MINUTES, MIN_MINUTES};
pub use scheduler::{ReminderScheduler, TickReport};
pub use short_id::{resolve, short_id, Resolution};
pub use sqlite_store::SqliteReminderStore;
pub use store::{InMemoryReminderStore, ReminderStore};
