//! Reminder persistence seam and the in-memory implementation
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use super::model::{default_id_source, IdSource, Reminder, ReminderDraft, ReminderStatus};
use crate::core::ReminderError;

/// Durable job queue of reminders.
///
/// Records are never removed; resolution is a one-way status change from
/// `pending` to `completed` or `cancelled`.
#[async_trait]
pub trait ReminderStore: Send + Sync {
    /// Persist a validated draft as a pending reminder
    async fn insert(&self, draft: ReminderDraft) -> Result<Reminder, ReminderError>;

    async fn get(&self, id: &str) -> Result<Option<Reminder>, ReminderError>;

    /// Pending reminders with `trigger_time <= now`, oldest trigger first
    async fn query_due(&self, now: DateTime<Utc>) -> Result<Vec<Reminder>, ReminderError>;

    /// Pending reminders of one chat, ascending by trigger time
    async fn query_pending_for(&self, chat_id: i64) -> Result<Vec<Reminder>, ReminderError>;

    /// Mark a pending reminder completed. A reminder that is no longer
    /// pending is left untouched.
    async fn complete(&self, id: &str, now: DateTime<Utc>) -> Result<(), ReminderError>;

    /// Cancel a pending reminder owned by `chat_id`
    async fn cancel(
        &self,
        id: &str,
        chat_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Reminder, ReminderError>;

    /// Validate and persist a new reminder due `minutes` after `now`
    async fn create(
        &self,
        chat_id: i64,
        minutes: i64,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<Reminder, ReminderError> {
        let draft = ReminderDraft::new(chat_id, minutes, text, now)?;
        self.insert(draft).await
    }
}

/// Checks shared by every store before a cancellation is applied
pub(crate) fn check_cancellable(reminder: &Reminder, chat_id: i64) -> Result<(), ReminderError> {
    if reminder.chat_id != chat_id {
        return Err(ReminderError::Forbidden(reminder.id.clone()));
    }
    if !reminder.is_pending() {
        return Err(ReminderError::AlreadyResolved {
            id: reminder.id.clone(),
            status: reminder.status,
        });
    }
    Ok(())
}

/// Reminder store held in process memory, for tests and ephemeral runs
pub struct InMemoryReminderStore {
    reminders: DashMap<String, Reminder>,
    ids: IdSource,
}

impl Default for InMemoryReminderStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryReminderStore {
    pub fn new() -> Self {
        Self::with_id_source(default_id_source())
    }

    pub fn with_id_source(ids: IdSource) -> Self {
        Self {
            reminders: DashMap::new(),
            ids,
        }
    }

    /// Total records of any status
    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }

    fn collect_sorted<F>(&self, predicate: F) -> Vec<Reminder>
    where
        F: Fn(&Reminder) -> bool,
    {
        let mut found: Vec<Reminder> = self
            .reminders
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by(|a, b| a.trigger_time.cmp(&b.trigger_time).then_with(|| a.id.cmp(&b.id)));
        found
    }
}

#[async_trait]
impl ReminderStore for InMemoryReminderStore {
    async fn insert(&self, draft: ReminderDraft) -> Result<Reminder, ReminderError> {
        let id = (self.ids)();
        if self.reminders.contains_key(&id) {
            return Err(ReminderError::Store(format!("duplicate reminder id {id}")));
        }
        let reminder = Reminder::from_draft(id.clone(), draft);
        self.reminders.insert(id, reminder.clone());
        Ok(reminder)
    }

    async fn get(&self, id: &str) -> Result<Option<Reminder>, ReminderError> {
        Ok(self.reminders.get(id).map(|r| r.clone()))
    }

    async fn query_due(&self, now: DateTime<Utc>) -> Result<Vec<Reminder>, ReminderError> {
        Ok(self.collect_sorted(|r| r.is_due(now)))
    }

    async fn query_pending_for(&self, chat_id: i64) -> Result<Vec<Reminder>, ReminderError> {
        Ok(self.collect_sorted(|r| r.chat_id == chat_id && r.is_pending()))
    }

    async fn complete(&self, id: &str, now: DateTime<Utc>) -> Result<(), ReminderError> {
        let mut entry = self
            .reminders
            .get_mut(id)
            .ok_or_else(|| ReminderError::NotFound(id.to_string()))?;
        if entry.is_pending() {
            entry.status = ReminderStatus::Completed;
            entry.completed_time = Some(now);
        }
        Ok(())
    }

    async fn cancel(
        &self,
        id: &str,
        chat_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Reminder, ReminderError> {
        let mut entry = self
            .reminders
            .get_mut(id)
            .ok_or_else(|| ReminderError::NotFound(id.to_string()))?;
        check_cancellable(&entry, chat_id)?;
        entry.status = ReminderStatus::Cancelled;
        entry.cancelled_time = Some(now);
        Ok(entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reminders::model::MAX_MINUTES;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 10, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_create_persists_pending() {
        let store = InMemoryReminderStore::new();
        let r = store.create(100, 5, "Llamar al doctor", t0()).await.unwrap();

        assert_eq!(r.status, ReminderStatus::Pending);
        assert_eq!(r.trigger_time, t0() + Duration::seconds(300));
        assert_eq!(store.get(&r.id).await.unwrap(), Some(r));
    }

    #[tokio::test]
    async fn test_invalid_create_persists_nothing() {
        let store = InMemoryReminderStore::new();
        assert!(store.create(1, 0, "x", t0()).await.is_err());
        assert!(store.create(1, -3, "x", t0()).await.is_err());
        assert!(store.create(1, MAX_MINUTES + 1, "x", t0()).await.is_err());
        assert!(store.create(1, 5, "  ", t0()).await.is_err());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_query_due_boundary() {
        let store = InMemoryReminderStore::new();
        let r = store.create(1, 1, "x", t0()).await.unwrap();

        assert!(store.query_due(t0() + Duration::seconds(59)).await.unwrap().is_empty());
        let due = store.query_due(t0() + Duration::seconds(60)).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, r.id);
    }

    #[tokio::test]
    async fn test_pending_for_chat_sorted() {
        let store = InMemoryReminderStore::new();
        store.create(1, 30, "tarde", t0()).await.unwrap();
        store.create(1, 5, "pronto", t0()).await.unwrap();
        store.create(2, 1, "otro chat", t0()).await.unwrap();

        let texts: Vec<String> = store
            .query_pending_for(1)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.text)
            .collect();
        assert_eq!(texts, vec!["pronto", "tarde"]);
    }

    #[tokio::test]
    async fn test_complete_only_affects_pending() {
        let store = InMemoryReminderStore::new();
        let r = store.create(1, 1, "x", t0()).await.unwrap();
        store.cancel(&r.id, 1, t0()).await.unwrap();

        store.complete(&r.id, t0() + Duration::minutes(2)).await.unwrap();
        let stored = store.get(&r.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ReminderStatus::Cancelled);
        assert!(stored.completed_time.is_none());
    }

    #[tokio::test]
    async fn test_cancel_outcomes() {
        let store = InMemoryReminderStore::new();
        let r = store.create(1, 10, "x", t0()).await.unwrap();

        assert!(matches!(
            store.cancel("missing", 1, t0()).await,
            Err(ReminderError::NotFound(_))
        ));
        assert!(matches!(
            store.cancel(&r.id, 2, t0()).await,
            Err(ReminderError::Forbidden(_))
        ));

        let cancelled = store.cancel(&r.id, 1, t0()).await.unwrap();
        assert_eq!(cancelled.status, ReminderStatus::Cancelled);
        assert_eq!(cancelled.cancelled_time, Some(t0()));

        assert!(matches!(
            store.cancel(&r.id, 1, t0()).await,
            Err(ReminderError::AlreadyResolved {
                status: ReminderStatus::Cancelled,
                ..
            })
        ));
        assert!(store.query_pending_for(1).await.unwrap().is_empty());
        assert!(store.query_due(t0() + Duration::days(1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_custom_id_source() {
        let counter = std::sync::atomic::AtomicUsize::new(0);
        let store = InMemoryReminderStore::with_id_source(std::sync::Arc::new(move || {
            let n = counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            format!("abcd{n:04}")
        }));

        let a = store.create(1, 5, "a", t0()).await.unwrap();
        let b = store.create(1, 5, "b", t0()).await.unwrap();
        assert_eq!(a.id, "abcd0000");
        assert_eq!(b.short_id(), "abcd");
    }
}
