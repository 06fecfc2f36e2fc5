//! Chat input parsing for verified chats
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! Input resolves to exactly one [`Command`] variant, in priority order:
//! reminder-creation syntax, then `/` commands, then `Unrecognized`.

use regex::Regex;
use std::sync::OnceLock;

/// Everything a verified chat can ask for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `Recordar en <N> minutos: <text>`. Values are not yet range-checked.
    Remind { minutes: i64, text: String },
    Help,
    Status,
    List,
    Cancel { short_id: String },
    /// `/eliminar` with no id
    CancelMissingId,
    /// A `/command` we don't know
    UnknownCommand(String),
    /// Free text that isn't a reminder
    Unrecognized,
}

fn remind_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)^\s*Recordar\s+en\s+(-?[0-9]+)\s+minutos?\s*:(.*)$")
            .expect("reminder pattern is valid")
    })
}

/// Split `/name@bot args` into (`/name`, `args`). `None` if not a command.
pub fn split_command(text: &str) -> Option<(&str, &str)> {
    let text = text.trim();
    if !text.starts_with('/') {
        return None;
    }
    let (token, rest) = match text.split_once(char::is_whitespace) {
        Some((token, rest)) => (token, rest.trim()),
        None => (text, ""),
    };
    let name = token.split('@').next().unwrap_or(token);
    Some((name, rest))
}

/// True for `/start`, with or without a bot suffix or payload
pub fn is_start(text: &str) -> bool {
    matches!(split_command(text), Some(("/start", _)))
}

pub fn parse(text: &str) -> Command {
    if let Some(caps) = remind_pattern().captures(text) {
        // Too many digits for i64 is out of range anyway
        let minutes = caps[1].parse::<i64>().unwrap_or(i64::MAX);
        return Command::Remind {
            minutes,
            text: caps[2].trim().to_string(),
        };
    }

    match split_command(text) {
        Some(("/help", _)) => Command::Help,
        Some(("/status", _)) => Command::Status,
        Some(("/listar", _)) => Command::List,
        Some(("/eliminar", "")) => Command::CancelMissingId,
        Some(("/eliminar", args)) => Command::Cancel {
            short_id: args.split_whitespace().next().unwrap_or(args).to_string(),
        },
        Some((name, _)) => Command::UnknownCommand(name.to_string()),
        None => Command::Unrecognized,
    }
}
