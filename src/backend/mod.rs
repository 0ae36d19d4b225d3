pub mod client;
pub mod http;

pub use client::{
    AUTH_ERROR_TEXT, BackendError, CONNECTIVITY_ERROR_TEXT, ChatBackend, INVALID_RESPONSE_TEXT,
    Outcome,
};
pub use http::HttpBackend;
