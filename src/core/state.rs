//! # Application State
//!
//! Core business state for Parley. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── backend: Arc<dyn ChatBackend>   // where messages go
//! ├── transcript: Transcript          // append-only conversation log
//! ├── input: InputControls            // enabled / placeholder / focus
//! ├── lockout: Lockout                // Unlocked ⇄ Locked
//! ├── turns: Vec<ChatTurn>            // one per accepted submission
//! ├── pacing_delay: Duration          // pause before each request
//! └── status_message: String          // title bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;
use std::time::Duration;

use crate::backend::ChatBackend;
use crate::core::config::ResolvedConfig;
use crate::core::lockout::{InputControls, Lockout};
use crate::core::transcript::Transcript;
use crate::core::turn::{ChatTurn, TurnId};

pub const WELCOME_STATUS: &str = "Welcome to Parley!";

pub struct App {
    pub backend: Arc<dyn ChatBackend>,
    pub transcript: Transcript,
    pub input: InputControls,
    pub lockout: Lockout,
    pub turns: Vec<ChatTurn>,
    pub pacing_delay: Duration,
    pub status_message: String,
}

impl App {
    pub fn from_config(backend: Arc<dyn ChatBackend>, config: &ResolvedConfig) -> Self {
        Self {
            backend,
            transcript: Transcript::new(config.show_timestamps),
            input: InputControls::new(config.placeholder.clone()),
            lockout: Lockout::new(config.lockout, config.waiting_placeholder.clone()),
            turns: Vec::new(),
            pacing_delay: config.pacing_delay,
            status_message: String::from(WELCOME_STATUS),
        }
    }

    pub fn turn_mut(&mut self, id: TurnId) -> Option<&mut ChatTurn> {
        self.turns.iter_mut().find(|t| t.id == id)
    }

    /// True while any turn is waiting on its pacing delay or its reply.
    pub fn has_pending_turn(&self) -> bool {
        self.turns.iter().any(|t| !t.is_terminal())
    }

    /// True while a request is on the wire.
    pub fn is_waiting(&self) -> bool {
        self.turns.iter().any(|t| t.dispatched && !t.is_terminal())
    }
}
