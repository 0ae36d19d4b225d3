//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Waiting** (typing indicator visible): draws every ~80ms to animate.
//! - **Pending** (pacing delay running): polls every ~80ms so the dispatch
//!   is picked up promptly.
//! - **Idle**: sleeps up to 500ms, only redraws on events or resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call.

mod component;
mod components;
mod event;
mod ui;

use std::io::{self, stdout};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use log::{debug, info};
use ratatui::DefaultTerminal;

use crate::core::action::{Action, Effect, update};
use crate::core::runtime::{ActionReceiver, ActionSender, action_channel, perform};
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const FAST_POLL: Duration = Duration::from_millis(80);
const IDLE_POLL: Duration = Duration::from_millis(500);
/// One step of the typing animation.
const TICK: Duration = Duration::from_millis(400);

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
}

impl TuiState {
    pub fn new(app: &App) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(app.input.clone()),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste, Hide);
    }
}

/// Runs the interactive chat until the user quits.
pub fn run(mut app: App) -> io::Result<()> {
    let mut terminal = ratatui::init();
    let result = TerminalModeGuard::new().and_then(|_guard| event_loop(&mut terminal, &mut app));
    ratatui::restore();
    result
}

fn event_loop(terminal: &mut DefaultTerminal, app: &mut App) -> io::Result<()> {
    let mut tui = TuiState::new(app);
    let (tx, mut rx) = action_channel();

    let start_time = Instant::now();
    let mut needs_redraw = true;

    loop {
        tui.input_box.sync(&app.input);

        let animating = app.is_waiting();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let tick = (start_time.elapsed().as_millis() / TICK.as_millis()) as usize;
            terminal.draw(|f| ui::draw_ui(f, app, &mut tui, tick))?;
            needs_redraw = false;
        }

        let timeout = if app.has_pending_turn() {
            FAST_POLL
        } else {
            IDLE_POLL
        };

        // Process the first event and drain everything queued before the next draw
        let mut should_quit = false;
        let mut next = poll_event_timeout(timeout)?;
        while let Some(event) = next {
            needs_redraw = true;
            if handle_event(event, app, &mut tui, &tx) {
                should_quit = true;
                break;
            }
            next = poll_event_immediate()?;
        }

        if should_quit || drain_actions(app, &tx, &mut rx, &mut needs_redraw) {
            break;
        }
    }

    info!("Leaving the event loop");
    Ok(())
}

/// Routes one terminal event. Returns `true` when the app should quit.
fn handle_event(event: TuiEvent, app: &mut App, tui: &mut TuiState, tx: &ActionSender) -> bool {
    match event {
        TuiEvent::Resize => false,
        TuiEvent::Quit => update(app, Action::Quit) == Effect::Quit,
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            tui.message_list.handle_event(&event);
            false
        }
        _ => {
            if let Some(InputEvent::Submit(text)) = tui.input_box.handle_event(&event) {
                let effect = update(app, Action::Submit(text.clone()));
                if effect == Effect::None {
                    debug!("Submission rejected, keeping the draft");
                    tui.input_box.restore(text);
                } else {
                    perform(&effect, app, tx);
                }
                tui.input_box.sync(&app.input);
            }
            false
        }
    }
}

/// Applies actions sent by background tasks. Returns `true` on quit.
fn drain_actions(
    app: &mut App,
    tx: &ActionSender,
    rx: &mut ActionReceiver,
    needs_redraw: &mut bool,
) -> bool {
    while let Ok(action) = rx.try_recv() {
        *needs_redraw = true;
        debug!("Event loop received: {:?}", action);
        let effect = update(app, action);
        if effect == Effect::Quit {
            return true;
        }
        perform(&effect, app, tx);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Outcome;
    use crate::test_support::{ScriptedBackend, app_with_backend};

    fn type_str(app: &mut App, tui: &mut TuiState, tx: &ActionSender, text: &str) {
        for c in text.chars() {
            handle_event(TuiEvent::InputChar(c), app, tui, tx);
        }
    }

    #[tokio::test]
    async fn enter_while_locked_sends_nothing() {
        let backend = ScriptedBackend::new(vec![Outcome::Success("first".into())]);
        let calls = backend.calls();
        let mut app = app_with_backend(backend);
        let mut tui = TuiState::new(&app);
        let (tx, mut rx) = action_channel();

        type_str(&mut app, &mut tui, &tx, "one");
        handle_event(TuiEvent::Submit, &mut app, &mut tui, &tx);

        // Pacing ends: the request goes out and the input locks
        let due = rx.recv().await;
        assert!(matches!(due, Some(Action::DispatchDue(_))));
        if let Some(action) = due {
            let effect = update(&mut app, action);
            assert!(matches!(effect, Effect::SendRequest { .. }));
            perform(&effect, &app, &tx);
        }
        tui.input_box.sync(&app.input);
        assert!(app.lockout.is_locked());
        assert!(!tui.input_box.controls.enabled);

        type_str(&mut app, &mut tui, &tx, "two");
        handle_event(TuiEvent::Submit, &mut app, &mut tui, &tx);
        assert!(tui.input_box.buffer.is_empty());
        assert_eq!(app.turns.len(), 1);

        while app.has_pending_turn() {
            if let Some(action) = rx.recv().await {
                let effect = update(&mut app, action);
                perform(&effect, &app, &tx);
            }
        }
        tui.input_box.sync(&app.input);
        assert!(tui.input_box.controls.enabled);
        assert_eq!(calls.lock().unwrap().as_slice(), ["one"]);
    }

    #[tokio::test]
    async fn enter_during_pacing_keeps_draft() {
        let backend = ScriptedBackend::new(vec![Outcome::Success("first".into())]);
        let calls = backend.calls();
        let mut app = app_with_backend(backend);
        let mut tui = TuiState::new(&app);
        let (tx, mut rx) = action_channel();
        let mut redraw = false;

        type_str(&mut app, &mut tui, &tx, "one");
        handle_event(TuiEvent::Submit, &mut app, &mut tui, &tx);
        assert!(app.has_pending_turn());

        // Second Enter during the same turn is swallowed, draft kept
        type_str(&mut app, &mut tui, &tx, "two");
        handle_event(TuiEvent::Submit, &mut app, &mut tui, &tx);
        assert_eq!(app.turns.len(), 1);
        assert_eq!(tui.input_box.buffer, "two");

        while app.has_pending_turn() {
            if let Some(action) = rx.recv().await {
                let effect = update(&mut app, action);
                perform(&effect, &app, &tx);
            }
        }
        assert!(!drain_actions(&mut app, &tx, &mut rx, &mut redraw));
        assert_eq!(calls.lock().unwrap().as_slice(), ["one"]);
        assert!(app.input.enabled);
    }

    #[test]
    fn quit_event_quits() {
        let mut app = app_with_backend(ScriptedBackend::new(vec![]));
        let mut tui = TuiState::new(&app);
        let (tx, _rx) = action_channel();
        assert!(handle_event(TuiEvent::Quit, &mut app, &mut tui, &tx));
    }

    #[test]
    fn scroll_events_go_to_message_list() {
        let mut app = app_with_backend(ScriptedBackend::new(vec![]));
        let mut tui = TuiState::new(&app);
        let (tx, _rx) = action_channel();
        assert!(!handle_event(TuiEvent::ScrollUp, &mut app, &mut tui, &tx));
        assert!(!tui.message_list.stick_to_bottom);
        assert!(tui.input_box.buffer.is_empty());
    }
}
