//! # InputBox Component
//!
//! Single-line text input with a send control.
//!
//! The buffer and cursor are internal state. Whether the box accepts input,
//! whether send is available, the placeholder and focus are props copied
//! from the core's `InputControls` before each frame via [`InputBox::sync`].
//! While disabled, every editing event and Enter are ignored.

mod cursor;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};

use crate::core::lockout::InputControls;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::{CursorState, inner_width, next_char_boundary, prev_char_boundary};

/// Rows taken by the input: one line of text plus the border.
pub const HEIGHT: u16 = 3;

const SEND_LABEL: &str = "[ Send ⏎ ]";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed)
    Submit(String),
    ContentChanged,
}

pub struct InputBox {
    pub buffer: String,
    pub controls: InputControls,
    cursor: CursorState,
}

impl InputBox {
    pub fn new(controls: InputControls) -> Self {
        Self {
            buffer: String::new(),
            controls,
            cursor: CursorState::new(),
        }
    }

    /// Copy the current lock state from the core.
    pub fn sync(&mut self, controls: &InputControls) {
        if self.controls != *controls {
            self.controls = controls.clone();
        }
    }

    /// Put a rejected submission back, unless the user already started a new draft.
    pub fn restore(&mut self, text: String) {
        if self.buffer.is_empty() {
            self.buffer = text;
            self.cursor.pos = self.buffer.len();
        }
    }

    fn insert(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor.pos, text);
        self.cursor.pos += text.len();
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = inner_width(area.width);
        self.cursor.update_scroll(&self.buffer, width);

        let (border_style, send_style) = if self.controls.enabled {
            (Style::default(), Style::default().fg(Color::Green))
        } else {
            let dim = Style::default().fg(Color::DarkGray);
            (dim, dim)
        };
        let send_style = if self.controls.send_enabled {
            send_style
        } else {
            send_style.fg(Color::DarkGray).add_modifier(Modifier::DIM)
        };

        let block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(border_style)
            .title_bottom(Line::styled(SEND_LABEL, send_style).right_aligned());

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(self.controls.placeholder.as_str()).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Paragraph::new(self.cursor.visible(&self.buffer, width))
        };

        frame.render_widget(paragraph.block(block), area);

        if self.controls.enabled && self.controls.focused {
            frame.set_cursor_position(self.cursor.screen_pos(&self.buffer, area));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if !self.controls.enabled {
            if *event == TuiEvent::Submit {
                log::debug!("Enter ignored while input is disabled");
            }
            return None;
        }

        match event {
            TuiEvent::InputChar(c) => {
                let mut encoded = [0u8; 4];
                self.insert(c.encode_utf8(&mut encoded));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Single-line input: fold line breaks into spaces
                let flattened: String = text
                    .chars()
                    .filter(|c| *c != '\r')
                    .map(|c| if c == '\n' { ' ' } else { c })
                    .collect();
                self.insert(&flattened);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => (self.cursor.pos > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(prev..self.cursor.pos);
                self.cursor.pos = prev;
                InputEvent::ContentChanged
            }),
            TuiEvent::Delete => (self.cursor.pos < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(self.cursor.pos..next);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorLeft => (self.cursor.pos > 0).then(|| {
                self.cursor.pos = prev_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor.pos < self.buffer.len()).then(|| {
                self.cursor.pos = next_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => (self.cursor.pos != 0).then(|| {
                self.cursor.pos = 0;
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.cursor.pos != self.buffer.len()).then(|| {
                self.cursor.pos = self.buffer.len();
                InputEvent::ContentChanged
            }),
            TuiEvent::Submit => {
                if !self.controls.send_enabled || self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.cursor.reset();
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}
