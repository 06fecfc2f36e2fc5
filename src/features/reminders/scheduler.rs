//! Background delivery of due reminders
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! Each tick delivers first and commits second, so a crash between the two
//! steps re-delivers on the next start (at-least-once). Exactly one scheduler
//! is expected to run against a given store; nothing claims a reminder before
//! delivery, so two schedulers can double-deliver.

use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

use super::store::ReminderStore;
use crate::core::ReminderError;
use crate::features::messaging::MessageLifecycle;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Text delivered to the chat when a reminder fires
pub fn delivery_text(reminder_text: &str) -> String {
    format!("Recordatorio: {reminder_text}")
}

/// Result of one scheduler tick
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub due: usize,
    /// Sends the transport accepted
    pub delivered: usize,
    /// Reminders moved to `completed`
    pub completed: usize,
}

pub struct ReminderScheduler {
    store: Arc<dyn ReminderStore>,
    messenger: MessageLifecycle,
    interval: Duration,
}

impl ReminderScheduler {
    pub fn new(store: Arc<dyn ReminderStore>, messenger: MessageLifecycle) -> Self {
        Self {
            store,
            messenger,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run until the task is dropped. Store failures skip the tick, never stop the loop.
    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Reminder scheduler started (interval: {}s)",
            self.interval.as_secs()
        );

        loop {
            interval.tick().await;
            match self.tick(Utc::now()).await {
                Ok(report) if report.due > 0 => info!(
                    "Reminder tick: {} due, {} delivered, {} completed",
                    report.due, report.delivered, report.completed
                ),
                Ok(_) => debug!("Reminder tick: nothing due"),
                Err(e) => error!("Reminder tick skipped: {e}"),
            }
        }
    }

    /// Deliver every reminder due at `now`, sequentially, then mark each completed.
    ///
    /// A failed send still completes the reminder.
    pub async fn tick(&self, now: DateTime<Utc>) -> Result<TickReport, ReminderError> {
        let due = self.store.query_due(now).await?;
        let mut report = TickReport {
            due: due.len(),
            ..TickReport::default()
        };

        for reminder in due {
            let sent = self
                .messenger
                .send(reminder.chat_id, &delivery_text(&reminder.text))
                .await;
            match sent {
                Some(_) => report.delivered += 1,
                None => warn!(
                    "Reminder {} for chat {} could not be delivered",
                    reminder.id, reminder.chat_id
                ),
            }

            match self.store.complete(&reminder.id, now).await {
                Ok(()) => report.completed += 1,
                Err(e) => error!("Failed to mark reminder {} completed: {e}", reminder.id),
            }
        }

        Ok(report)
    }
}
