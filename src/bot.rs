use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::homework::{check_response, parse_status, ValidationError};
use crate::practicum::{ApiError, ReviewApi};
use crate::telegram::{self, Notifier, TelegramError};

/// State carried from one cycle to the next. Lives only in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollState {
    /// `from_date` for the next poll.
    pub timestamp: i64,
    /// Last status message delivered to the chat.
    pub last_report: Option<String>,
    /// Last failure text delivered to the chat.
    pub last_error: Option<String>,
}

impl PollState {
    pub fn starting_at(timestamp: i64) -> Self {
        Self {
            timestamp,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    NoActiveWork,
    Unchanged,
    StatusChanged(String),
}

#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    LogOnly,
    LogAndNotify,
}

fn failure_message(error: &CycleError) -> String {
    format!("Program failure: {error}")
}

pub struct Poller<A, N> {
    api: A,
    notifier: N,
    retry_period: Duration,
    state: PollState,
}

impl<A, N> Poller<A, N>
where
    A: ReviewApi,
    N: Notifier,
{
    pub fn new(api: A, notifier: N, retry_period: Duration, state: PollState) -> Self {
        Self {
            api,
            notifier,
            retry_period,
            state,
        }
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// One poll / validate / extract / compare / notify pass.
    #[tracing::instrument(name = "run_cycle", skip_all, fields(from_date = state.timestamp))]
    pub async fn run_cycle(
        &self,
        mut state: PollState,
    ) -> Result<(PollState, CycleOutcome), CycleError> {
        let response = self.api.get_api_answer(state.timestamp).await?;
        check_response(&response)?;
        tracing::info!("API response passed validation");

        let Some(latest) = response
            .get("homeworks")
            .and_then(Value::as_array)
            .and_then(|homeworks| homeworks.first())
        else {
            tracing::info!("No active work");
            return Ok((state, CycleOutcome::NoActiveWork));
        };

        let message = parse_status(latest)?;
        if state.last_report.as_deref() == Some(message.as_str()) {
            tracing::info!("Status unchanged");
            return Ok((state, CycleOutcome::Unchanged));
        }

        telegram::send_message(&self.notifier, &message).await;
        tracing::info!("Sent new status: {message}");

        if let Some(current_date) = response.get("current_date").and_then(Value::as_i64) {
            state.timestamp = current_date;
        }
        state.last_report = Some(message.clone());
        Ok((state, CycleOutcome::StatusChanged(message)))
    }

    pub fn policy_for(&self, error: &CycleError) -> ErrorPolicy {
        if self.state.last_error.as_deref() == Some(failure_message(error).as_str()) {
            ErrorPolicy::LogOnly
        } else {
            ErrorPolicy::LogAndNotify
        }
    }

    /// Runs a cycle and applies the failure policy. Only a failed failure
    /// notification is returned as an error.
    #[tracing::instrument(name = "tick", skip_all)]
    pub async fn tick(&mut self) -> Result<(), TelegramError> {
        let error = match self.run_cycle(self.state.clone()).await {
            Ok((mut state, _)) => {
                state.last_error = None;
                self.state = state;
                return Ok(());
            }
            Err(error) => error,
        };

        if let CycleError::Validation(invalid) = &error {
            tracing::debug!(kind = ?invalid.kind(), "API response failed validation");
        }
        let message = failure_message(&error);
        tracing::error!("{message}");

        match self.policy_for(&error) {
            ErrorPolicy::LogOnly => {
                tracing::debug!("Failure already reported to the chat");
            }
            ErrorPolicy::LogAndNotify => {
                self.notifier.notify(&message).await?;
                self.state.last_error = Some(message);
            }
        }
        Ok(())
    }

    /// Polls forever, sleeping `retry_period` after every cycle whatever its result.
    pub async fn run(mut self) -> Result<(), TelegramError> {
        tracing::info!(
            retry_period_secs = self.retry_period.as_secs(),
            from_date = self.state().timestamp,
            "Starting homework status polling"
        );
        loop {
            let result = self.tick().await;
            tokio::time::sleep(self.retry_period).await;
            result?;
        }
    }
}
