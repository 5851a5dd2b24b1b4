use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
const DEFAULT_RETRY_PERIOD_SECS: u64 = 600;

/// Raw credential values as found in the environment. Blank values count as absent.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub practicum_token: Option<String>,
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        Self {
            practicum_token: read("PRACTICUM_TOKEN"),
            telegram_token: read("TELEGRAM_TOKEN"),
            telegram_chat_id: read("TELEGRAM_CHAT_ID"),
        }
    }

    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.practicum_token.is_none() {
            missing.push("PRACTICUM_TOKEN");
        }
        if self.telegram_token.is_none() {
            missing.push("TELEGRAM_TOKEN");
        }
        if self.telegram_chat_id.is_none() {
            missing.push("TELEGRAM_CHAT_ID");
        }
        missing
    }
}

pub fn check_tokens(credentials: &Credentials) -> bool {
    credentials.missing().is_empty()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub endpoint: String,
    pub telegram_api_url: String,
    pub retry_period: Duration,
}

impl Config {
    pub fn from_env(credentials: Credentials) -> Result<Self> {
        Self::from_lookup(credentials, |name| env::var(name).ok())
    }

    pub fn from_lookup(
        credentials: Credentials,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let retry_secs = lookup("RETRY_PERIOD")
            .map(|val| val.trim().parse::<u64>())
            .transpose()
            .context("RETRY_PERIOD must be a whole number of seconds")?
            .unwrap_or(DEFAULT_RETRY_PERIOD_SECS);

        Ok(Self {
            practicum_token: credentials
                .practicum_token
                .context("PRACTICUM_TOKEN must be set")?,
            telegram_token: credentials
                .telegram_token
                .context("TELEGRAM_TOKEN must be set")?,
            telegram_chat_id: credentials
                .telegram_chat_id
                .context("TELEGRAM_CHAT_ID must be set")?,
            endpoint: lookup("PRACTICUM_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            telegram_api_url: lookup("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            retry_period: Duration::from_secs(retry_secs),
        })
    }
}
