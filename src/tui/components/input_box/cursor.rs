//! Cursor position and horizontal scroll for a single-line input.
//!
//! Positions are byte offsets into the buffer; scroll and screen positions
//! are display columns (via `unicode-width`).

use ratatui::layout::Rect;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Border on each side of the input block.
pub(super) const HORIZONTAL_OVERHEAD: u16 = 2;

/// Width available for text inside the bordered block.
pub(super) fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

#[derive(Debug, Default)]
pub(super) struct CursorState {
    /// Byte offset into the buffer
    pub pos: usize,
    /// First visible display column
    pub scroll: usize,
}

impl CursorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll = 0;
    }

    /// Display column of the cursor.
    pub fn column(&self, buffer: &str) -> usize {
        buffer[..self.pos].width()
    }

    /// Keep the cursor inside a window `width` columns wide.
    pub fn update_scroll(&mut self, buffer: &str, width: u16) {
        let width = width as usize;
        if width == 0 {
            self.scroll = 0;
            return;
        }
        let col = self.column(buffer);
        if col < self.scroll {
            self.scroll = col;
        } else if col >= self.scroll + width {
            self.scroll = col + 1 - width;
        }
    }

    /// The slice of `buffer` that is visible in a window `width` columns wide.
    pub fn visible<'a>(&self, buffer: &'a str, width: u16) -> &'a str {
        let width = width as usize;
        let mut col = 0;
        let mut start = buffer.len();
        let mut end = buffer.len();
        for (i, c) in buffer.char_indices() {
            if col >= self.scroll && start == buffer.len() {
                start = i;
            }
            let w = c.width().unwrap_or(0);
            if col + w > self.scroll + width {
                end = i;
                break;
            }
            col += w;
        }
        if start > end {
            return "";
        }
        &buffer[start..end]
    }

    /// Terminal cell for the cursor inside the bordered `area`.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let offset = self.column(buffer).saturating_sub(self.scroll) as u16;
        let max_x = area.x + inner_width(area.width);
        ((area.x + 1 + offset).min(max_x), area.y + 1)
    }
}
