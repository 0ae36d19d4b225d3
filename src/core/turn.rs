//! One user message and the bot reply it produced.

use std::fmt;

use crate::backend::Outcome;
use crate::core::transcript::EntryId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnId(uuid::Uuid);

impl TurnId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Pending,
    Fulfilled,
    Failed,
}

#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub id: TurnId,
    pub user_text: String,
    pub bot_text: Option<String>,
    pub timestamp: String,
    pub state: TurnState,
    /// Typing placeholder shown while the request is in flight.
    pub typing_entry: Option<EntryId>,
    /// Set once the request has been handed to the backend.
    pub dispatched: bool,
}

impl ChatTurn {
    pub fn new(user_text: String, timestamp: String) -> Self {
        Self {
            id: TurnId::new(),
            user_text,
            bot_text: None,
            timestamp,
            state: TurnState::Pending,
            typing_entry: None,
            dispatched: false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state != TurnState::Pending
    }

    /// Moves the turn to its terminal state.
    ///
    /// Returns `false` without touching anything if the turn already ended.
    pub fn resolve(&mut self, outcome: &Outcome) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.bot_text = Some(outcome.display_text().to_string());
        self.state = if outcome.is_success() {
            TurnState::Fulfilled
        } else {
            TurnState::Failed
        };
        true
    }
}
