mod bot;
mod config;
mod homework;
mod logger;
mod models;
mod practicum;
mod telegram;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::bot::{PollState, Poller};
use crate::config::{Config, Credentials};
use crate::practicum::PracticumClient;
use crate::telegram::TelegramBot;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logger::init_logging()?;

    let credentials = Credentials::from_env();
    if !config::check_tokens(&credentials) {
        let message = format!(
            "Missing required tokens: {}",
            credentials.missing().join(", ")
        );
        tracing::error!("{message}");
        anyhow::bail!(message);
    }

    let config = Config::from_env(credentials).context("Invalid configuration")?;

    tracing::info!(
        endpoint = %config.endpoint,
        retry_period_secs = config.retry_period.as_secs(),
        "Starting homework status bot"
    );

    let api = PracticumClient::new(config.endpoint, config.practicum_token);
    let bot = TelegramBot::new(
        config.telegram_api_url,
        config.telegram_token,
        config.telegram_chat_id,
    );
    let state = PollState::starting_at(Utc::now().timestamp());

    Poller::new(api, bot, config.retry_period, state)
        .run()
        .await
        .context("Failed to report a program failure to Telegram")
}
