//! HTTP transport for the portfolio backend.
//!
//! All egress goes through [`HttpBackend`]. Controllers depend on the
//! [`ChatBackend`] and [`AnalysisBackend`] capability traits, so tests and
//! alternative transports can stand in without touching controller code.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chat::Turn;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: &'a [Turn],
}

/// Reply envelope from `POST /api/chat`.
///
/// `reply` may be absent; the chat session substitutes a fallback string
/// rather than treating that as a failure.
#[derive(Debug, Deserialize)]
pub struct ChatReply {
    pub reply: Option<String>,
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    resume: &'a str,
    job: &'a str,
}

/// Analysis result bag from `POST /api/analyze-resume`.
///
/// Every field is optional: the client stores whatever the backend sent and
/// validates nothing locally. A new result replaces the previous one
/// wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub match_score: Option<f64>,
    pub summary: Option<String>,
    pub strengths: Option<String>,
    pub improvements: Option<String>,
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat(&self, messages: &[Turn]) -> Result<ChatReply, BackendError>;
}

#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn analyze(&self, resume: &str, job: &str) -> Result<AnalysisResult, BackendError>;
}

/// The portfolio API over HTTP.
///
/// No retry, no backoff, no timeout: a request that never settles keeps its
/// controller pending, which is the designed backpressure behavior.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        T: serde::de::DeserializeOwned,
        B: Serialize + Sync,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(BackendError::Parse)
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn chat(&self, messages: &[Turn]) -> Result<ChatReply, BackendError> {
        self.post_json("/api/chat", &ChatRequest { messages }).await
    }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    async fn analyze(&self, resume: &str, job: &str) -> Result<AnalysisResult, BackendError> {
        self.post_json("/api/analyze-resume", &AnalyzeRequest { resume, job })
            .await
    }
}
