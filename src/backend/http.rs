//! HTTP chat backend.
//!
//! Speaks the single JSON exchange of the chat service:
//!
//! ```text
//! POST /get   {"message": "..."}   →   {"response": "...", "status": "success"}
//! ```
//!
//! Every path through `send_message` ends in one `Outcome`; nothing is
//! returned as an error.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::backend::{BackendError, ChatBackend, Outcome};

// ============================================================================
// Wire Types
// ============================================================================

/// The request body.
#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// The success body. `status` is informational only.
#[derive(Deserialize, Debug)]
struct ChatReply {
    response: String,
    #[serde(default)]
    status: Option<String>,
}

// ============================================================================
// Classification
// ============================================================================

/// Maps an HTTP status and body to an `Outcome`.
fn classify(status: StatusCode, body: &str) -> Outcome {
    if status == StatusCode::UNAUTHORIZED {
        return Outcome::AuthError;
    }
    if !status.is_success() {
        return Outcome::HttpError(status.as_u16());
    }

    match serde_json::from_str::<ChatReply>(body) {
        Ok(reply) => {
            if let Some(s) = reply.status.as_deref() {
                debug!("Backend reported status '{}'", s);
            }
            Outcome::Success(reply.response)
        }
        Err(e) => Outcome::PayloadError(e.to_string()),
    }
}

// ============================================================================
// Backend Implementation
// ============================================================================

/// Chat backend reached over HTTP.
pub struct HttpBackend {
    url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Builds a backend posting to `base_url` + `endpoint`.
    ///
    /// `timeout` bounds the whole request; hitting it is a transport failure.
    pub fn new(base_url: &str, endpoint: &str, timeout: Duration) -> Result<Self, BackendError> {
        let base = base_url.trim_end_matches('/');
        if base.is_empty() {
            return Err(BackendError::Config("base URL is empty".to_string()));
        }
        let url = format!("{}/{}", base, endpoint.trim_start_matches('/'));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Config(e.to_string()))?;

        Ok(Self { url, client })
    }

    /// The full endpoint URL requests are posted to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    fn name(&self) -> &str {
        &self.url
    }

    async fn send_message(&self, text: &str) -> Outcome {
        info!("POST {} (message_len={})", self.url, text.len());

        // `.json()` sets Content-Type: application/json
        let response = match self
            .client
            .post(&self.url)
            .json(&ChatRequest { message: text })
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("Request to {} failed: {}", self.url, e);
                return Outcome::TransportError(e.to_string());
            }
        };

        let status = response.status();
        debug!("Backend response status: {}", status);

        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                warn!("Failed to read response body: {}", e);
                return Outcome::TransportError(e.to_string());
            }
        };

        let outcome = classify(status, &body);
        if !outcome.is_success() {
            warn!("Backend outcome: {} (body: {})", outcome, body);
        }
        outcome
    }
}
