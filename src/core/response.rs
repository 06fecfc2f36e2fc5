//! Chat reply formatting helpers
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

/// Telegram message text limit (characters)
pub const MESSAGE_LIMIT: usize = 4096;

/// Truncate text to at most `max_chars` characters, adding "..." when cut
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Truncate text to fit a single outbound message
pub fn truncate_for_message(text: &str) -> String {
    truncate_chars(text, MESSAGE_LIMIT)
}

fn plural(n: i64, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

/// Format a duration given in seconds as Spanish text, e.g. "1 hora 30 minutos"
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    if seconds < 60 {
        plural(seconds, "segundo", "segundos")
    } else if seconds < 3600 {
        plural(seconds / 60, "minuto", "minutos")
    } else if seconds < 86400 {
        let hours = seconds / 3600;
        let mins = (seconds % 3600) / 60;
        if mins > 0 {
            format!("{} {}", plural(hours, "hora", "horas"), plural(mins, "minuto", "minutos"))
        } else {
            plural(hours, "hora", "horas")
        }
    } else {
        let days = seconds / 86400;
        let hours = (seconds % 86400) / 3600;
        if hours > 0 {
            format!("{} {}", plural(days, "dia", "dias"), plural(hours, "hora", "horas"))
        } else {
            plural(days, "dia", "dias")
        }
    }
}
