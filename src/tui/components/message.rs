use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};

use crate::core::transcript::{Entry, Sender};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Frames of the typing indicator, cycled by the animation tick.
const TYPING_FRAMES: [&str; 4] = ["", ".", "..", "..."];

/// A stateless component that renders a single transcript entry.
///
/// `Message` is created fresh each frame by `MessageList`. User entries are
/// green, bot entries blue, and the typing placeholder is dim gray with
/// animated dots.
///
/// [`calculate_height`](Self::calculate_height) predicts the rendered height
/// with `textwrap` so the list can size its scroll canvas before drawing.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub entry: &'a Entry,
    /// Animation tick, only used by the typing placeholder.
    pub tick: usize,
}

impl<'a> Message<'a> {
    pub fn new(entry: &'a Entry, tick: usize) -> Self {
        Self { entry, tick }
    }

    /// Calculate the height required for this entry given a width.
    ///
    /// The wrapping options must match Ratatui's `Paragraph` wrapping so the
    /// calculated and actual heights agree.
    pub fn calculate_height(entry: &Entry, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }

        if entry.is_typing() {
            return 1 + VERTICAL_OVERHEAD;
        }

        let content = entry.text.trim();
        if content.is_empty() {
            return VERTICAL_OVERHEAD;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(content, options).len();
        u16::try_from(lines)
            .unwrap_or(u16::MAX)
            .max(1)
            .saturating_add(VERTICAL_OVERHEAD)
    }

    fn title(&self) -> String {
        match &self.entry.timestamp {
            Some(stamp) => format!("{} · {}", self.entry.sender.label(), stamp),
            None => self.entry.sender.label().to_string(),
        }
    }

    fn body(&self) -> String {
        if self.entry.is_typing() {
            format!("typing{}", TYPING_FRAMES[self.tick % TYPING_FRAMES.len()])
        } else {
            self.entry.text.trim().to_string()
        }
    }
}

pub(crate) fn entry_style(entry: &Entry) -> Style {
    if entry.is_typing() {
        return Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC);
    }
    match entry.sender {
        Sender::User => Style::default().fg(Color::Green),
        Sender::Bot => Style::default().fg(Color::Blue),
    }
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = entry_style(self.entry);
        let border_style = style.add_modifier(Modifier::DIM);

        let block = Block::bordered()
            .title(self.title())
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.body())
            .style(style)
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}
