//! SQLite-backed reminder store
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! Timestamps are stored as unix seconds. All access goes through one
//! connection behind a mutex, so each store call is atomic with respect to
//! the others (a cancel can't interleave with a complete on the same row).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use sqlite::{Connection, ConnectionWithFullMutex, State, Statement};
use std::sync::Mutex;

use super::model::{default_id_source, IdSource, Reminder, ReminderDraft, ReminderStatus};
use super::store::{check_cancellable, ReminderStore};
use crate::core::ReminderError;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS reminders (
        id TEXT PRIMARY KEY,
        chat_id INTEGER NOT NULL,
        text TEXT NOT NULL,
        created_time INTEGER NOT NULL,
        trigger_time INTEGER NOT NULL,
        status TEXT NOT NULL DEFAULT 'pending',
        completed_time INTEGER,
        cancelled_time INTEGER
    );
    CREATE INDEX IF NOT EXISTS idx_reminders_due ON reminders (status, trigger_time);
    CREATE INDEX IF NOT EXISTS idx_reminders_chat ON reminders (chat_id, status);
";

const COLUMNS: &str =
    "id, chat_id, text, created_time, trigger_time, status, completed_time, cancelled_time";

pub struct SqliteReminderStore {
    conn: Mutex<ConnectionWithFullMutex>,
    ids: IdSource,
}

impl SqliteReminderStore {
    /// Open (or create) the database at `path`; `:memory:` gives a private in-memory db
    pub fn open(path: &str) -> Result<Self, ReminderError> {
        Self::open_with_id_source(path, default_id_source())
    }

    pub fn open_with_id_source(path: &str, ids: IdSource) -> Result<Self, ReminderError> {
        let conn = Connection::open_with_full_mutex(path)?;
        conn.execute(SCHEMA)?;
        info!("Reminder database ready at {path}");
        Ok(Self {
            conn: Mutex::new(conn),
            ids,
        })
    }

    fn with_conn<T, F>(&self, f: F) -> Result<T, ReminderError>
    where
        F: FnOnce(&Connection) -> Result<T, ReminderError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|_| ReminderError::Store("reminder database lock poisoned".to_string()))?;
        f(&conn)
    }
}

fn from_unix(secs: i64) -> Result<DateTime<Utc>, ReminderError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| ReminderError::Store(format!("invalid timestamp {secs}")))
}

fn read_row(statement: &Statement) -> Result<Reminder, ReminderError> {
    let status: String = statement.read("status")?;
    let status = status
        .parse::<ReminderStatus>()
        .map_err(|e| ReminderError::Store(e.to_string()))?;

    let completed_time = statement
        .read::<Option<i64>, _>("completed_time")?
        .map(from_unix)
        .transpose()?;
    let cancelled_time = statement
        .read::<Option<i64>, _>("cancelled_time")?
        .map(from_unix)
        .transpose()?;

    Ok(Reminder {
        id: statement.read("id")?,
        chat_id: statement.read("chat_id")?,
        text: statement.read("text")?,
        created_time: from_unix(statement.read("created_time")?)?,
        trigger_time: from_unix(statement.read("trigger_time")?)?,
        status,
        completed_time,
        cancelled_time,
    })
}

fn collect_rows(statement: &mut Statement) -> Result<Vec<Reminder>, ReminderError> {
    let mut rows = Vec::new();
    while let State::Row = statement.next()? {
        rows.push(read_row(statement)?);
    }
    Ok(rows)
}

fn fetch_one(conn: &Connection, id: &str) -> Result<Option<Reminder>, ReminderError> {
    let mut statement = conn.prepare(format!("SELECT {COLUMNS} FROM reminders WHERE id = ?"))?;
    statement.bind((1, id))?;
    Ok(collect_rows(&mut statement)?.pop())
}

#[async_trait]
impl ReminderStore for SqliteReminderStore {
    async fn insert(&self, draft: ReminderDraft) -> Result<Reminder, ReminderError> {
        let reminder = Reminder::from_draft((self.ids)(), draft);
        self.with_conn(|conn| {
            let mut statement = conn.prepare(
                "INSERT INTO reminders (id, chat_id, text, created_time, trigger_time, status)
                 VALUES (?, ?, ?, ?, ?, 'pending')",
            )?;
            statement.bind((1, reminder.id.as_str()))?;
            statement.bind((2, reminder.chat_id))?;
            statement.bind((3, reminder.text.as_str()))?;
            statement.bind((4, reminder.created_time.timestamp()))?;
            statement.bind((5, reminder.trigger_time.timestamp()))?;
            statement.next()?;
            Ok(())
        })?;
        Ok(reminder)
    }

    async fn get(&self, id: &str) -> Result<Option<Reminder>, ReminderError> {
        self.with_conn(|conn| fetch_one(conn, id))
    }

    async fn query_due(&self, now: DateTime<Utc>) -> Result<Vec<Reminder>, ReminderError> {
        self.with_conn(|conn| {
            let mut statement = conn.prepare(format!(
                "SELECT {COLUMNS} FROM reminders
                 WHERE status = 'pending' AND trigger_time <= ?
                 ORDER BY trigger_time ASC, id ASC"
            ))?;
            statement.bind((1, now.timestamp()))?;
            collect_rows(&mut statement)
        })
    }

    async fn query_pending_for(&self, chat_id: i64) -> Result<Vec<Reminder>, ReminderError> {
        self.with_conn(|conn| {
            let mut statement = conn.prepare(format!(
                "SELECT {COLUMNS} FROM reminders
                 WHERE chat_id = ? AND status = 'pending'
                 ORDER BY trigger_time ASC, id ASC"
            ))?;
            statement.bind((1, chat_id))?;
            collect_rows(&mut statement)
        })
    }

    async fn complete(&self, id: &str, now: DateTime<Utc>) -> Result<(), ReminderError> {
        self.with_conn(|conn| {
            if fetch_one(conn, id)?.is_none() {
                return Err(ReminderError::NotFound(id.to_string()));
            }
            let mut statement = conn.prepare(
                "UPDATE reminders SET status = 'completed', completed_time = ?
                 WHERE id = ? AND status = 'pending'",
            )?;
            statement.bind((1, now.timestamp()))?;
            statement.bind((2, id))?;
            statement.next()?;
            Ok(())
        })
    }

    async fn cancel(
        &self,
        id: &str,
        chat_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Reminder, ReminderError> {
        self.with_conn(|conn| {
            let mut reminder =
                fetch_one(conn, id)?.ok_or_else(|| ReminderError::NotFound(id.to_string()))?;
            check_cancellable(&reminder, chat_id)?;

            let mut statement = conn.prepare(
                "UPDATE reminders SET status = 'cancelled', cancelled_time = ?
                 WHERE id = ? AND status = 'pending'",
            )?;
            statement.bind((1, now.timestamp()))?;
            statement.bind((2, id))?;
            statement.next()?;

            reminder.status = ReminderStatus::Cancelled;
            reminder.cancelled_time = Some(now);
            Ok(reminder)
        })
    }
}
