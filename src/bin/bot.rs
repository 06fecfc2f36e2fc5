use anyhow::{Context, Result};
use dotenvy::dotenv;
use log::{error, info};
use std::sync::Arc;

use gatekeeper::commands::CommandHandler;
use gatekeeper::core::Config;
use gatekeeper::features::messaging::MessageLifecycle;
use gatekeeper::features::reminders::{ReminderScheduler, SqliteReminderStore};
use gatekeeper::features::sessions::InMemorySessionStore;
use gatekeeper::features::verification::VerificationGate;
use gatekeeper::telegram::{TelegramClient, UpdatePoller};
use gatekeeper::UpdateHandler;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting gatekeeper bot...");

    let reminders = Arc::new(
        SqliteReminderStore::open(&config.database_path)
            .with_context(|| format!("opening reminder database {}", config.database_path))?,
    );
    let sessions = Arc::new(InMemorySessionStore::new());

    let client = TelegramClient::new(&config.api_url, &config.bot_token)
        .context("building Telegram client")?;
    let messenger = MessageLifecycle::new(Arc::new(client.clone()));

    let gate = VerificationGate::new(
        sessions,
        messenger.clone(),
        config.bot_password.clone(),
        config.timing,
    );
    let commands = CommandHandler::new(reminders.clone(), messenger.clone());
    let handler = UpdateHandler::new(gate, commands);

    // Start the reminder scheduler
    let scheduler =
        ReminderScheduler::new(reminders, messenger).with_interval(config.poll_interval);
    let scheduler_task = tokio::spawn(scheduler.run());

    info!("Bot configured successfully. Listening for messages...");

    tokio::select! {
        _ = UpdatePoller::new(client, handler).run() => {
            error!("Update polling stopped unexpectedly");
        }
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => info!("Shutdown signal received, stopping"),
                Err(e) => error!("Failed to listen for shutdown signal: {e}"),
            }
        }
    }

    scheduler_task.abort();
    Ok(())
}
