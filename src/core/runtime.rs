//! # Effect Runtime
//!
//! Carries out the `Effect`s returned by `update()`. Each one becomes a small
//! tokio task that reports back by sending an `Action` on the channel.
//!
//! The request task owns an [`OutcomeGuard`]. If the task ends without
//! reporting (panic, abort), dropping the guard reports a transport failure
//! instead, so every dispatched turn still reaches a terminal outcome and the
//! input lockout is always released.

use log::{debug, info, warn};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::backend::Outcome;
use crate::core::action::{Action, Effect, update};
use crate::core::state::App;
use crate::core::transcript::Sender;
use crate::core::turn::{TurnId, TurnState};

pub type ActionSender = UnboundedSender<Action>;
pub type ActionReceiver = UnboundedReceiver<Action>;

pub fn action_channel() -> (ActionSender, ActionReceiver) {
    unbounded_channel()
}

/// Reports exactly one outcome for a turn, even if the task dies first.
pub struct OutcomeGuard {
    turn: TurnId,
    tx: ActionSender,
    reported: bool,
}

impl OutcomeGuard {
    pub fn new(turn: TurnId, tx: ActionSender) -> Self {
        Self {
            turn,
            tx,
            reported: false,
        }
    }

    pub fn report(mut self, outcome: Outcome) {
        self.reported = true;
        self.send(outcome);
    }

    fn send(&self, outcome: Outcome) {
        if self
            .tx
            .send(Action::OutcomeReceived {
                turn: self.turn,
                outcome,
            })
            .is_err()
        {
            warn!("Failed to report outcome for turn {}: receiver dropped", self.turn);
        }
    }
}

impl Drop for OutcomeGuard {
    fn drop(&mut self) {
        if !self.reported {
            warn!("Request task for turn {} ended without an outcome", self.turn);
            self.send(Outcome::TransportError(
                "request ended without a response".to_string(),
            ));
        }
    }
}

/// Runs an effect. `None` and `Quit` are handled by the caller.
pub fn perform(effect: &Effect, app: &App, tx: &ActionSender) {
    match effect {
        Effect::ScheduleDispatch { turn, delay } => spawn_pacing(*turn, *delay, tx.clone()),
        Effect::SendRequest { turn, message } => {
            spawn_request(app, *turn, message.clone(), tx.clone())
        }
        Effect::None | Effect::Quit => {}
    }
}

fn spawn_pacing(turn: TurnId, delay: std::time::Duration, tx: ActionSender) {
    debug!("Turn {} dispatches in {:?}", turn, delay);
    tokio::spawn(async move {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if tx.send(Action::DispatchDue(turn)).is_err() {
            warn!("Failed to send DispatchDue for turn {}: receiver dropped", turn);
        }
    });
}

fn spawn_request(app: &App, turn: TurnId, message: String, tx: ActionSender) {
    info!("Spawning request for turn {} via {}", turn, app.backend.name());
    let backend = app.backend.clone();
    tokio::spawn(async move {
        let guard = OutcomeGuard::new(turn, tx);
        let outcome = backend.send_message(&message).await;
        guard.report(outcome);
    });
}

/// Processes actions and effects until no turn is pending.
///
/// Headless counterpart of the TUI event loop.
pub async fn run_until_settled(app: &mut App, tx: &ActionSender, rx: &mut ActionReceiver) {
    while app.has_pending_turn() {
        let Some(action) = rx.recv().await else {
            warn!("Action channel closed with turns still pending");
            return;
        };
        let effect = update(app, action);
        perform(&effect, app, tx);
    }
}

/// Submits `text` and waits for its turn to finish.
///
/// Returns `false` if the submission was rejected (empty or locked).
pub async fn submit_and_settle(
    app: &mut App,
    text: &str,
    tx: &ActionSender,
    rx: &mut ActionReceiver,
) -> bool {
    let effect = update(app, Action::Submit(text.to_string()));
    if effect == Effect::None {
        return false;
    }
    perform(&effect, app, tx);
    run_until_settled(app, tx, rx).await;
    true
}

/// Result of sending a single message without the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneShot {
    /// Nothing was sent (empty text).
    Rejected,
    /// The turn finished; `text` is the bot entry, `ok` is false on failure.
    Replied { text: String, ok: bool },
}

/// Runs one turn to completion and reports the bot entry it produced.
pub async fn one_shot(
    app: &mut App,
    text: &str,
    tx: &ActionSender,
    rx: &mut ActionReceiver,
) -> OneShot {
    if !submit_and_settle(app, text, tx, rx).await {
        return OneShot::Rejected;
    }
    let ok = app.turns.iter().all(|t| t.state == TurnState::Fulfilled);
    let text = app
        .transcript
        .messages()
        .filter(|e| e.sender == Sender::Bot)
        .last()
        .map(|e| e.text.clone())
        .unwrap_or_default();
    OneShot::Replied { text, ok }
}
