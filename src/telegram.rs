use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Telegram request failed: {0}")]
    Request(reqwest::Error),
    #[error("Telegram API error {status}: {description}")]
    Api {
        status: StatusCode,
        description: String,
    },
}

/// Delivers text to the configured chat.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> Result<(), TelegramError>;
}

/// Telegram Bot API client bound to a single chat.
#[derive(Clone)]
pub struct TelegramBot {
    http: reqwest::Client,
    api_url: String,
    token: String,
    chat_id: String,
}

impl TelegramBot {
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into(),
            token: token.into(),
            chat_id: chat_id.into(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_url.trim_end_matches('/'),
            self.token,
            method
        )
    }

    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), TelegramError> {
        let request = SendMessageRequest { chat_id, text };

        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&request)
            .send()
            .await
            .map_err(TelegramError::Request)?;

        let status = response.status();
        let body = response.text().await.map_err(TelegramError::Request)?;
        let reply = serde_json::from_str::<BotApiReply>(&body).ok();

        if status.is_success() && reply.as_ref().map_or(false, |r| r.ok) {
            return Ok(());
        }

        Err(TelegramError::Api {
            status,
            description: reply.and_then(|r| r.description).unwrap_or(body),
        })
    }
}

#[async_trait]
impl Notifier for TelegramBot {
    async fn notify(&self, text: &str) -> Result<(), TelegramError> {
        self.send_message(&self.chat_id, text).await
    }
}

/// Sends `message`, logging instead of propagating a delivery failure.
#[tracing::instrument(name = "send_message", skip_all)]
pub async fn send_message<N>(bot: &N, message: &str)
where
    N: Notifier + ?Sized,
{
    tracing::debug!("Sending Telegram message: {message}");
    match bot.notify(message).await {
        Ok(()) => tracing::info!("Telegram message sent"),
        Err(err) => tracing::error!(error = %err, "Failed to send Telegram message"),
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct BotApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}
