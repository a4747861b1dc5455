use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub const NETWORK_ERROR_TEXT: &str = "Проблемы с сетью, попробуйте позднее.";
pub const TIMEOUT_ERROR_TEXT: &str = "Сервер недоступен, попробуйте позднее.";

/// Timeouts applied to every outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTimeouts {
    /// Whole request, from connect to the last body byte.
    pub total: Duration,
    pub connect: Duration,
    /// Maximum silence between two reads.
    pub read: Duration,
}

impl Default for FetchTimeouts {
    fn default() -> Self {
        Self {
            total: Duration::from_secs(10),
            connect: Duration::from_secs(10),
            read: Duration::from_secs(10),
        }
    }
}

/// Classified result of one GET request.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success { status: u16, body: Value },
    /// Upstream answered 400..418 with an `error.message` body.
    ClientError { status: u16, message: String },
    NetworkError,
    TimeoutError,
    UnknownError,
}

/// The non-success half of [`FetchOutcome`], for use with `?`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("upstream rejected the request ({status}): {message}")]
    Client { status: u16, message: String },
    #[error("network unavailable")]
    Network,
    #[error("upstream timed out")]
    Timeout,
    #[error("unexpected upstream response")]
    Unknown,
}

impl FetchFailure {
    /// Text shown to the user. Empty for [`FetchFailure::Unknown`].
    pub fn reply_text(&self) -> &str {
        match self {
            Self::Client { message, .. } => message,
            Self::Network => NETWORK_ERROR_TEXT,
            Self::Timeout => TIMEOUT_ERROR_TEXT,
            Self::Unknown => "",
        }
    }
}

impl FetchOutcome {
    pub fn into_result(self) -> Result<Value, FetchFailure> {
        match self {
            Self::Success { body, .. } => Ok(body),
            Self::ClientError { status, message } => Err(FetchFailure::Client { status, message }),
            Self::NetworkError => Err(FetchFailure::Network),
            Self::TimeoutError => Err(FetchFailure::Timeout),
            Self::UnknownError => Err(FetchFailure::Unknown),
        }
    }

    /// Short name for logs.
    fn label(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::ClientError { .. } => "client_error",
            Self::NetworkError => "network_error",
            Self::TimeoutError => "timeout",
            Self::UnknownError => "unknown",
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Single-attempt JSON GET client. Idle connections are never kept, so each
/// call opens and closes its own connection.
#[derive(Clone)]
pub struct FetchClient {
    client: Client,
}

impl FetchClient {
    pub fn new(timeouts: FetchTimeouts) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeouts.total)
            .connect_timeout(timeouts.connect)
            .read_timeout(timeouts.read)
            .pool_max_idle_per_host(0)
            .build()?;
        Ok(Self { client })
    }

    /// Issue one GET. Never fails: every error becomes a [`FetchOutcome`].
    pub async fn fetch(&self, url: Url, headers: &[(&'static str, &str)]) -> FetchOutcome {
        let target = redacted(&url);
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let outcome = match request.send().await {
            Ok(resp) => {
                let status = resp.status();
                match resp.text().await {
                    Ok(text) => decode(status, &text),
                    Err(e) => {
                        tracing::warn!("Reading body from {} failed: {}", target, e);
                        classify(&e)
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Request to {} failed: {}", target, e);
                classify(&e)
            }
        };

        match &outcome {
            FetchOutcome::Success { status, .. } => tracing::debug!("GET {} -> {}", target, status),
            other => tracing::warn!("GET {} -> {}", target, other.label()),
        }
        outcome
    }
}

/// Turn a status line and raw body into an outcome.
fn decode(status: StatusCode, text: &str) -> FetchOutcome {
    let status = status.as_u16();
    match status {
        200 => match serde_json::from_str(text) {
            Ok(body) => FetchOutcome::Success { status, body },
            Err(e) => {
                tracing::warn!("Malformed JSON in 200 response: {}", e);
                FetchOutcome::UnknownError
            }
        },
        400..=417 => match serde_json::from_str::<ErrorEnvelope>(text) {
            Ok(envelope) => FetchOutcome::ClientError {
                status,
                message: envelope.error.message,
            },
            Err(_) => FetchOutcome::UnknownError,
        },
        _ => FetchOutcome::UnknownError,
    }
}

fn classify(err: &reqwest::Error) -> FetchOutcome {
    if err.is_timeout() {
        FetchOutcome::TimeoutError
    } else if err.is_connect() || err.is_request() || err.is_body() {
        FetchOutcome::NetworkError
    } else {
        FetchOutcome::UnknownError
    }
}

/// Host and path only; query strings carry API keys.
fn redacted(url: &Url) -> String {
    format!("{}{}", url.host_str().unwrap_or_default(), url.path())
}
