//! Cashback bot
//!
//! A chat bot that records cashback percentages per bank and category and
//! ranks banks for a category on request.

mod bot;
mod config;
mod db;
mod dialogue;
mod menu;
mod session;
mod state_machine;
mod telegram;

use bot::BotRunner;
use config::Config;
use db::Database;
use dialogue::DialogueController;
use session::InMemorySessions;
use telegram::TelegramClient;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cashback_bot=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = Config::from_env()?;

    // Ensure database directory exists
    if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(path = %config.db_path.display(), "Opening database");
    let db = Database::open(&config.db_path)?;

    let transport = TelegramClient::new(&config.api_url, &config.bot_token, config.poll_timeout)?;
    let controller = DialogueController::new(db.clone(), InMemorySessions::new());

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            match shutdown_signal().await {
                Ok(()) => cancel.cancel(),
                Err(e) => tracing::error!(error = %e, "Failed to install signal handlers"),
            }
        }
    });

    let runner = BotRunner::new(transport, controller, cancel);
    runner.run().await;

    db.close()?;
    tracing::info!("Database closed, exiting");
    Ok(())
}

/// Wait for SIGTERM or SIGINT
async fn shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM - shutting down");
        }
        _ = sigint.recv() => {
            tracing::info!("Received SIGINT - shutting down");
        }
    }
    Ok(())
}
