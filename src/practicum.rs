use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request to the review API could not complete.
    #[error("API request failed: {0}")]
    Request(reqwest::Error),
    /// The review API answered with something other than 200.
    #[error("API returned status {0}, expected 200")]
    Response(StatusCode),
    #[error("API response is not valid JSON: {0}")]
    Decode(reqwest::Error),
}

/// Source of homework status envelopes.
#[async_trait]
pub trait ReviewApi: Send + Sync {
    async fn get_api_answer(&self, timestamp: i64) -> Result<Value, ApiError>;
}

#[derive(Clone)]
pub struct PracticumClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl ReviewApi for PracticumClient {
    #[tracing::instrument(name = "get_api_answer", skip(self))]
    async fn get_api_answer(&self, timestamp: i64) -> Result<Value, ApiError> {
        tracing::debug!(endpoint = %self.endpoint, "Requesting homework statuses");
        let response = self
            .http
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", timestamp)])
            .send()
            .await
            .map_err(ApiError::Request)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::Response(status));
        }

        response.json::<Value>().await.map_err(ApiError::Decode)
    }
}
