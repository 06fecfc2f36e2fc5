//! Short-id resolution for listing and cancelling reminders
//!
//! Users refer to reminders by the first few characters of their id. A prefix
//! is resolved against one chat's pending reminders only.

use super::model::Reminder;

/// Characters shown to users
pub const SHORT_ID_LEN: usize = 4;
/// Candidates returned when a prefix is ambiguous
pub const MAX_CANDIDATES: usize = 5;

/// First `SHORT_ID_LEN` characters of an id
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    NotFound,
    Resolved(Reminder),
    /// At most `MAX_CANDIDATES` reminders; `total` counts every match
    Ambiguous {
        candidates: Vec<Reminder>,
        total: usize,
    },
}

/// Resolve `prefix` against `pending`. Never mutates anything.
pub fn resolve(pending: &[Reminder], prefix: &str) -> Resolution {
    let prefix = prefix.trim().to_lowercase();
    if prefix.is_empty() {
        return Resolution::NotFound;
    }

    let mut matches: Vec<&Reminder> = pending
        .iter()
        .filter(|r| r.id.to_lowercase().starts_with(&prefix))
        .collect();

    match matches.len() {
        0 => Resolution::NotFound,
        1 => Resolution::Resolved(matches.remove(0).clone()),
        total => Resolution::Ambiguous {
            candidates: matches.into_iter().take(MAX_CANDIDATES).cloned().collect(),
            total,
        },
    }
}
