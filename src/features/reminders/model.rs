//! Reminder records and creation-time validation

use chrono::{DateTime, Duration, SubsecRound, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::ReminderError;

/// Shortest allowed reminder delay, in minutes
pub const MIN_MINUTES: i64 = 1;
/// Longest allowed reminder delay, in minutes (one week)
pub const MAX_MINUTES: i64 = 10080;

/// Lifecycle of a reminder. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderStatus::Pending => "pending",
            ReminderStatus::Completed => "completed",
            ReminderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReminderStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "pending" => Ok(ReminderStatus::Pending),
            "completed" => Ok(ReminderStatus::Completed),
            "cancelled" => Ok(ReminderStatus::Cancelled),
            _ => Err(anyhow::anyhow!("Invalid reminder status: {}", s)),
        }
    }
}

/// A persisted one-shot reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    /// Opaque id assigned by the store
    pub id: String,
    pub chat_id: i64,
    pub text: String,
    pub created_time: DateTime<Utc>,
    pub trigger_time: DateTime<Utc>,
    pub status: ReminderStatus,
    pub completed_time: Option<DateTime<Utc>>,
    pub cancelled_time: Option<DateTime<Utc>>,
}

impl Reminder {
    pub fn from_draft(id: String, draft: ReminderDraft) -> Self {
        Self {
            id,
            chat_id: draft.chat_id,
            text: draft.text,
            created_time: draft.created_time,
            trigger_time: draft.trigger_time,
            status: ReminderStatus::Pending,
            completed_time: None,
            cancelled_time: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ReminderStatus::Pending
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.is_pending() && self.trigger_time <= now
    }

    /// User-facing short reference
    pub fn short_id(&self) -> &str {
        super::short_id::short_id(&self.id)
    }
}

/// A validated reminder that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderDraft {
    pub chat_id: i64,
    pub text: String,
    pub created_time: DateTime<Utc>,
    pub trigger_time: DateTime<Utc>,
}

impl ReminderDraft {
    /// Validate the minute range and text, fixing the trigger time relative to `now`
    pub fn new(
        chat_id: i64,
        minutes: i64,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, ReminderError> {
        if !(MIN_MINUTES..=MAX_MINUTES).contains(&minutes) {
            return Err(ReminderError::InvalidMinutes(minutes));
        }

        let text = text.trim();
        if text.is_empty() {
            return Err(ReminderError::EmptyText);
        }

        // Stores keep whole seconds
        let created_time = now.trunc_subsecs(0);
        Ok(Self {
            chat_id,
            text: text.to_string(),
            created_time,
            trigger_time: created_time + Duration::seconds(minutes * 60),
        })
    }
}

/// Produces fresh reminder ids
pub type IdSource = Arc<dyn Fn() -> String + Send + Sync>;

pub fn new_reminder_id() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn default_id_source() -> IdSource {
    Arc::new(new_reminder_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_draft_trigger_time() {
        for minutes in [MIN_MINUTES, 5, 90, 1440, MAX_MINUTES] {
            let draft = ReminderDraft::new(1, minutes, "Llamar al doctor", now()).unwrap();
            assert_eq!(draft.trigger_time, draft.created_time + Duration::seconds(minutes * 60));
            assert!(draft.trigger_time > draft.created_time);
        }
    }

    #[test]
    fn test_draft_rejects_out_of_range_minutes() {
        for minutes in [-5, 0, MAX_MINUTES + 1, i64::MAX] {
            let err = ReminderDraft::new(1, minutes, "x", now()).unwrap_err();
            assert!(matches!(err, ReminderError::InvalidMinutes(m) if m == minutes));
        }
    }

    #[test]
    fn test_draft_trims_and_rejects_blank_text() {
        let draft = ReminderDraft::new(1, 5, "  comprar pan \n", now()).unwrap();
        assert_eq!(draft.text, "comprar pan");

        assert!(matches!(
            ReminderDraft::new(1, 5, "   ", now()),
            Err(ReminderError::EmptyText)
        ));
    }

    #[test]
    fn test_draft_drops_subseconds() {
        let precise = now() + Duration::milliseconds(750);
        let draft = ReminderDraft::new(1, 1, "x", precise).unwrap();
        assert_eq!(draft.created_time, now());
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            ReminderStatus::Pending,
            ReminderStatus::Completed,
            ReminderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<ReminderStatus>().unwrap(), status);
        }
        assert!("deleted".parse::<ReminderStatus>().is_err());
    }

    #[test]
    fn test_ids_are_unique_hex() {
        let a = new_reminder_id();
        let b = new_reminder_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
