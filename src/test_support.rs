//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::backend::{ChatBackend, Outcome};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;

/// Replays a fixed list of outcomes and records every message it was sent.
///
/// Panics when asked for more replies than it was given.
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Outcome>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<Outcome>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the messages received so far.
    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn send_message(&self, text: &str) -> Outcome {
        self.calls.lock().unwrap().push(text.to_string());
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(outcome) => outcome,
            None => panic!("ScriptedBackend has no reply left for {text:?}"),
        }
    }
}

/// Config used by tests: no pacing delay, no timestamps, lockout on.
pub fn test_config() -> ResolvedConfig {
    ResolvedConfig {
        pacing_delay: Duration::ZERO,
        show_timestamps: false,
        ..ResolvedConfig::default()
    }
}

pub fn app_with_backend(backend: ScriptedBackend) -> App {
    App::from_config(Arc::new(backend), &test_config())
}

/// Creates a test App whose backend replays `replies`.
pub fn test_app(replies: Vec<Outcome>) -> App {
    app_with_backend(ScriptedBackend::new(replies))
}

/// Like `test_app`, with a hook to adjust the config first.
pub fn test_app_with(replies: Vec<Outcome>, adjust: impl FnOnce(&mut ResolvedConfig)) -> App {
    let mut config = test_config();
    adjust(&mut config);
    App::from_config(Arc::new(ScriptedBackend::new(replies)), &config)
}
