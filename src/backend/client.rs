use std::fmt;

use async_trait::async_trait;

/// Shown for transport failures and any non-401 HTTP error status.
pub const CONNECTIVITY_ERROR_TEXT: &str =
    "Sorry, I'm having trouble connecting to my brain right now. Please try again later.";
/// Shown when the backend answers HTTP 401.
pub const AUTH_ERROR_TEXT: &str =
    "Authentication failed. Please check your credentials and try again.";
/// Shown when the reply body is not JSON or has no `response` field.
pub const INVALID_RESPONSE_TEXT: &str =
    "Sorry, I received an invalid response. Please try again.";

/// Terminal result of one request to the chat backend.
///
/// Every request produces exactly one of these. Failures are values here,
/// not errors: the dispatcher renders all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// HTTP 2xx with a well-formed `{"response": ...}` body.
    Success(String),
    /// HTTP 401.
    AuthError,
    /// Any other non-2xx status.
    HttpError(u16),
    /// The request never completed (DNS, connect, timeout, body read).
    TransportError(String),
    /// A reply arrived but could not be understood.
    PayloadError(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Text of the bot entry that reports this outcome.
    pub fn display_text(&self) -> &str {
        match self {
            Outcome::Success(text) => text,
            Outcome::AuthError => AUTH_ERROR_TEXT,
            Outcome::HttpError(_) | Outcome::TransportError(_) => CONNECTIVITY_ERROR_TEXT,
            Outcome::PayloadError(_) => INVALID_RESPONSE_TEXT,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success(text) => write!(f, "success ({} bytes)", text.len()),
            Outcome::AuthError => write!(f, "authentication error (HTTP 401)"),
            Outcome::HttpError(status) => write!(f, "HTTP error {status}"),
            Outcome::TransportError(reason) => write!(f, "transport error: {reason}"),
            Outcome::PayloadError(reason) => write!(f, "payload error: {reason}"),
        }
    }
}

/// Errors raised while building a backend. Request failures are `Outcome`s.
#[derive(Debug)]
pub enum BackendError {
    /// Backend misconfigured (bad URL, client could not be built).
    Config(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Config(msg) => write!(f, "backend config error: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Returns a short label for the backend (shown in the title bar).
    fn name(&self) -> &str;

    /// Sends one message and resolves to its terminal outcome.
    async fn send_message(&self, text: &str) -> Outcome;
}
