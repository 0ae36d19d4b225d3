//! # Actions
//!
//! Everything that can happen in Parley becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! The pacing delay elapses? That's `Action::DispatchDue(turn)`.
//! The backend answers (or doesn't)? That's `Action::OutcomeReceived { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates the
//! state, and returns an `Effect` describing the I/O the caller must perform.
//! No I/O happens here; see `runtime::perform` for that.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! One turn end to end:
//!
//! ```text
//! Submit(text) ──▶ user entry ──▶ ScheduleDispatch
//!                                        │ pacing delay
//! DispatchDue  ──▶ lock + typing ──▶ SendRequest
//!                                        │ backend
//! OutcomeReceived ──▶ typing removed, bot entry, unlock
//! ```

use std::time::Duration;

use log::{debug, info, warn};

use crate::backend::Outcome;
use crate::core::state::App;
use crate::core::transcript::{Sender, now_timestamp};
use crate::core::turn::{ChatTurn, TurnId};

pub const WAITING_STATUS: &str = "Waiting for reply...";

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Raw text from the input box.
    Submit(String),
    /// The pacing delay for `TurnId` has elapsed.
    DispatchDue(TurnId),
    /// Terminal result of the request for `turn`.
    OutcomeReceived { turn: TurnId, outcome: Outcome },
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Wait `delay`, then feed back `Action::DispatchDue(turn)`.
    ScheduleDispatch { turn: TurnId, delay: Duration },
    /// Send `message` to the backend, then feed back `Action::OutcomeReceived`.
    SendRequest { turn: TurnId, message: String },
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(raw) => submit(app, &raw),
        Action::DispatchDue(turn) => dispatch(app, turn),
        Action::OutcomeReceived { turn, outcome } => complete(app, turn, outcome),
        Action::Quit => Effect::Quit,
    }
}

fn submit(app: &mut App, raw: &str) -> Effect {
    let text = raw.trim();
    if text.is_empty() {
        return Effect::None;
    }
    if !app.input.enabled || app.lockout.is_locked() {
        debug!("Submission suppressed: input is locked");
        return Effect::None;
    }
    if app.lockout.is_enabled() && app.has_pending_turn() {
        debug!("Submission suppressed: previous turn still pending");
        return Effect::None;
    }

    let turn = ChatTurn::new(text.to_string(), now_timestamp());
    let id = turn.id;
    app.transcript.append(Sender::User, text);
    app.turns.push(turn);
    info!("Turn {} submitted (len={})", id, text.len());

    Effect::ScheduleDispatch {
        turn: id,
        delay: app.pacing_delay,
    }
}

fn dispatch(app: &mut App, id: TurnId) -> Effect {
    let Some(idx) = app.turns.iter().position(|t| t.id == id) else {
        warn!("DispatchDue for unknown turn {}", id);
        return Effect::None;
    };
    if app.turns[idx].dispatched || app.turns[idx].is_terminal() {
        warn!("DispatchDue for turn {} ignored: already dispatched", id);
        return Effect::None;
    }

    app.lockout.lock(&mut app.input);
    app.status_message = WAITING_STATUS.to_string();
    let typing = app.transcript.show_typing();

    let turn = &mut app.turns[idx];
    turn.typing_entry = Some(typing);
    turn.dispatched = true;
    info!("Dispatching turn {}", id);

    Effect::SendRequest {
        turn: id,
        message: turn.user_text.clone(),
    }
}

fn complete(app: &mut App, id: TurnId, outcome: Outcome) -> Effect {
    let Some(turn) = app.turn_mut(id) else {
        warn!("Outcome for unknown turn {}: {}", id, outcome);
        return Effect::None;
    };
    if turn.is_terminal() {
        warn!("Outcome for turn {} ignored: already resolved", id);
        return Effect::None;
    }

    let typing = turn.typing_entry.take();
    turn.resolve(&outcome);
    info!("Turn {} resolved: {}", id, outcome);

    if let Some(typing) = typing {
        app.transcript.remove_typing(typing);
    }
    app.transcript.append(Sender::Bot, outcome.display_text());

    app.lockout.unlock(&mut app.input);
    app.status_message = if app.is_waiting() {
        WAITING_STATUS.to_string()
    } else if outcome.is_success() {
        String::new()
    } else {
        outcome.to_string()
    };

    Effect::None
}
