//! Environment-driven configuration
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::{anyhow, Context, Result};
use std::time::Duration;

const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Process configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub bot_password: String,
    pub database_path: String,
    pub log_level: String,
    pub api_url: String,
    pub poll_interval: Duration,
    pub timing: GateTiming,
}

/// Deletion delays used by the verification gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateTiming {
    /// Delay before a user's password attempt is scrubbed
    pub scrub_delay: Duration,
    /// Lifetime of the first password prompt
    pub prompt_ttl: Duration,
    /// Lifetime of retry prompts and the confirmation reply
    pub transient_ttl: Duration,
}

impl Default for GateTiming {
    fn default() -> Self {
        Self {
            scrub_delay: Duration::from_secs(2),
            prompt_ttl: Duration::from_secs(60 * 60),
            transient_ttl: Duration::from_secs(2),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (env vars in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup("BOT_TOKEN")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("BOT_TOKEN must be set"))?;

        let bot_password = lookup("BOT_PASSWORD")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow!("BOT_PASSWORD must be set and non-empty"))?;

        let defaults = GateTiming::default();
        let timing = GateTiming {
            scrub_delay: secs(&lookup, "SCRUB_DELAY_SECS", defaults.scrub_delay)?,
            prompt_ttl: secs(&lookup, "PROMPT_TTL_SECS", defaults.prompt_ttl)?,
            transient_ttl: secs(&lookup, "TRANSIENT_TTL_SECS", defaults.transient_ttl)?,
        };

        let poll_interval = secs(&lookup, "REMINDER_POLL_INTERVAL_SECS", Duration::from_secs(30))?;
        if poll_interval.is_zero() {
            return Err(anyhow!("REMINDER_POLL_INTERVAL_SECS must be greater than zero"));
        }

        Ok(Config {
            bot_token,
            bot_password,
            database_path: lookup("DATABASE_PATH").unwrap_or_else(|| "reminders.db".to_string()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            api_url: lookup("TELEGRAM_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            poll_interval,
            timing,
        })
    }
}

fn secs<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => {
            let value: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{key} must be a whole number of seconds, got {raw:?}"))?;
            Ok(Duration::from_secs(value))
        }
        None => Ok(default),
    }
}
