//! # Input Lockout
//!
//! Keeps the user from submitting while a request is in flight.
//!
//! ```text
//!            lock (dispatch start)
//!  Unlocked ─────────────────────────▶ Locked
//!     ▲                                  │
//!     └──────────────────────────────────┘
//!          unlock (any terminal outcome)
//! ```
//!
//! Locking disables the text input and the send control, swaps the
//! placeholder for a waiting indicator and drops focus. Unlocking reverses
//! all of it and hands focus back to the input.

use log::debug;

/// The state of the input widgets, rendered by the UI adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputControls {
    pub enabled: bool,
    pub send_enabled: bool,
    pub placeholder: String,
    pub focused: bool,
}

impl InputControls {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            enabled: true,
            send_enabled: true,
            placeholder: placeholder.into(),
            focused: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LockState {
    Unlocked,
    Locked { saved_placeholder: String },
}

#[derive(Debug, Clone)]
pub struct Lockout {
    state: LockState,
    enabled: bool,
    waiting_placeholder: String,
}

impl Lockout {
    /// A disabled lockout never locks; every call is a no-op.
    pub fn new(enabled: bool, waiting_placeholder: impl Into<String>) -> Self {
        Self {
            state: LockState::Unlocked,
            enabled,
            waiting_placeholder: waiting_placeholder.into(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.state, LockState::Locked { .. })
    }

    /// `Unlocked → Locked`. Returns `false` if nothing changed.
    pub fn lock(&mut self, input: &mut InputControls) -> bool {
        if !self.enabled || self.is_locked() {
            return false;
        }
        let saved_placeholder =
            std::mem::replace(&mut input.placeholder, self.waiting_placeholder.clone());
        input.enabled = false;
        input.send_enabled = false;
        input.focused = false;
        self.state = LockState::Locked { saved_placeholder };
        debug!("Input locked");
        true
    }

    /// `Locked → Unlocked`. Returns `false` if it was not locked.
    pub fn unlock(&mut self, input: &mut InputControls) -> bool {
        match std::mem::replace(&mut self.state, LockState::Unlocked) {
            LockState::Locked { saved_placeholder } => {
                input.placeholder = saved_placeholder;
                input.enabled = true;
                input.send_enabled = true;
                input.focused = true;
                debug!("Input unlocked");
                true
            }
            LockState::Unlocked => false,
        }
    }
}
