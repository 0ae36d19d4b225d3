//! # MessageList Component
//!
//! Scrollable view of the transcript.
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the `Transcript` (props).
//! Rendering mutates the state: the layout cache is refreshed and, when the
//! transcript gained an entry since the last frame, the view jumps to the
//! newest entry.

use log::debug;
use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::transcript::{Entry, Transcript};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Message;
use crate::tui::event::TuiEvent;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on each frame
    pub stick_to_bottom: bool,
    /// Transcript revision drawn by the previous frame
    pub last_revision: u64,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            last_revision: 0,
            viewport_height: 0,
        }
    }

    /// Re-attach to the bottom if the transcript changed since the last frame.
    ///
    /// Returns `true` when a new revision was observed.
    pub fn observe_revision(&mut self, revision: u64) -> bool {
        if revision == self.last_revision {
            return false;
        }
        self.last_revision = revision;
        self.stick_to_bottom = true;
        true
    }

    fn max_offset(&self) -> u16 {
        self.layout
            .total_height()
            .saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub transcript: &'a Transcript,
    pub tick: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut MessageListState, transcript: &'a Transcript, tick: usize) -> Self {
        Self {
            state,
            transcript,
            tick,
        }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let entries = self.transcript.entries();

        if self.state.observe_revision(self.transcript.revision()) {
            debug!(
                "Transcript revision {} ({} entries), scrolling to newest",
                self.transcript.revision(),
                entries.len()
            );
        }

        self.state
            .layout
            .refresh(entries, self.transcript.revision(), content_width);

        self.state.viewport_height = area.height;
        if entries.is_empty() {
            return;
        }
        if self.state.stick_to_bottom {
            // Pin before choosing what to draw so the newest entry lands in this frame
            let bottom = self.state.max_offset();
            self.state.scroll_state.set_offset(Position { x: 0, y: bottom });
        } else {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        let total_height = self.state.layout.total_height();
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };

        let first = self.state.layout.first;
        for i in visible_range {
            let height = self.state.layout.heights[i];
            let rect = Rect::new(0, y_offset, content_width, height);
            scroll_view.render_widget(Message::new(&entries[first + i], self.tick), rect);
            y_offset = y_offset.saturating_add(height);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// Event handling lives on the persistent state; `MessageList` itself is
/// rebuilt every frame.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
                self.scroll_state.scroll_to_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Cached entry heights, rebuilt whenever the transcript or width changes.
///
/// Canvas rows are `u16`. When the transcript is taller than that, only the
/// newest entries that fit are laid out; `first` is the index of the oldest
/// one kept, and `heights[i]` belongs to `entries[first + i]`.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    pub first: usize,
    entry_count: usize,
    revision: u64,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            first: 0,
            entry_count: 0,
            revision: 0,
            content_width: 0,
        }
    }

    /// Whether the cached heights still describe `entries` at `content_width`.
    ///
    /// Removing a typing placeholder does not bump the revision, so the entry
    /// count is checked as well.
    pub fn is_fresh(&self, entry_count: usize, revision: u64, content_width: u16) -> bool {
        self.entry_count == entry_count
            && self.revision == revision
            && self.content_width == content_width
            && self.first + self.heights.len() == entry_count
    }

    pub fn refresh(&mut self, entries: &[Entry], revision: u64, content_width: u16) {
        if self.is_fresh(entries.len(), revision, content_width) {
            return;
        }
        let all: Vec<u16> = entries
            .iter()
            .map(|entry| Message::calculate_height(entry, content_width))
            .collect();

        let mut total: u32 = 0;
        let mut first = all.len();
        for (i, &height) in all.iter().enumerate().rev() {
            total += u32::from(height);
            if total > u32::from(u16::MAX) {
                break;
            }
            first = i;
        }
        if first > 0 {
            debug!(
                "Transcript taller than the canvas, laying out entries {}..{}",
                first,
                all.len()
            );
        }

        self.first = first;
        self.heights = all[first..].to_vec();
        self.rebuild_prefix_heights();
        self.entry_count = entries.len();
        self.revision = revision;
        self.content_width = content_width;
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn visible_range(
        &self,
        scroll_offset: u16,
        viewport_height: u16,
    ) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transcript::Sender;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn transcript(texts: &[&str]) -> Transcript {
        let mut t = Transcript::new(false);
        for text in texts {
            t.append(Sender::User, *text);
        }
        t
    }

    #[test]
    fn layout_refresh_tracks_revision_and_width() {
        let mut t = transcript(&["a", "b"]);
        let mut cache = LayoutCache::new();
        cache.refresh(t.entries(), t.revision(), 40);
        assert_eq!(cache.heights, vec![3, 3]);
        assert_eq!(cache.total_height(), 6);
        assert!(cache.is_fresh(2, t.revision(), 40));
        assert!(!cache.is_fresh(2, t.revision(), 30));

        t.append(Sender::Bot, "c");
        assert!(!cache.is_fresh(3, t.revision(), 40));
        cache.refresh(t.entries(), t.revision(), 40);
        assert_eq!(cache.prefix_heights, vec![3, 6, 9]);
    }

    #[test]
    fn layout_refresh_notices_typing_removal() {
        let mut t = transcript(&["a"]);
        let typing = t.show_typing();
        let mut cache = LayoutCache::new();
        cache.refresh(t.entries(), t.revision(), 40);
        assert_eq!(cache.heights.len(), 2);

        t.remove_typing(typing);
        cache.refresh(t.entries(), t.revision(), 40);
        assert_eq!(cache.heights.len(), 1);
    }

    #[test]
    fn visible_range_covers_viewport() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![3; 10];
        cache.rebuild_prefix_heights();
        // Viewport 6 rows at offset 12 with a 3-row buffer on each side
        let range = cache.visible_range(12, 6);
        assert!(range.start <= 3);
        assert!(range.end >= 6);
        assert!(range.end <= 10);
    }

    #[test]
    fn new_revision_reattaches_to_bottom() {
        let mut state = MessageListState::new();
        state.stick_to_bottom = false;
        assert!(!state.observe_revision(0));
        assert!(!state.stick_to_bottom);

        assert!(state.observe_revision(1));
        assert!(state.stick_to_bottom);
        assert!(!state.observe_revision(1));
    }

    #[test]
    fn scrolling_up_detaches_from_bottom() {
        let mut state = MessageListState::new();
        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);
        state.handle_event(&TuiEvent::ScrollToBottom);
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn scrolling_down_to_end_repins() {
        let mut state = MessageListState::new();
        state.layout.heights = vec![3; 4];
        state.layout.rebuild_prefix_heights();
        state.viewport_height = 12;
        state.stick_to_bottom = false;
        // Content fits in the viewport, so any scroll-down lands at the bottom
        state.handle_event(&TuiEvent::ScrollDown);
        assert!(state.stick_to_bottom);
        assert_eq!(state.scroll_state.offset().y, 0);
    }

    fn tall_transcript() -> Transcript {
        // 22,000 three-row entries plus one four-row entry: taller than a u16 canvas
        let mut t = Transcript::new(false);
        t.append(Sender::Bot, "a reply long enough to wrap onto a second line");
        for _ in 0..22_000 {
            t.append(Sender::User, "hi");
        }
        t.append(Sender::Bot, "newest");
        t
    }

    #[test]
    fn layout_keeps_newest_entries_within_canvas() {
        let t = tall_transcript();
        let mut cache = LayoutCache::new();
        cache.refresh(t.entries(), t.revision(), 39);

        assert!(cache.first > 0);
        assert_eq!(cache.first + cache.heights.len(), t.entries().len());
        let total: u32 = cache.heights.iter().map(|&h| u32::from(h)).sum();
        assert_eq!(u32::from(cache.total_height()), total);
        assert!(cache.is_fresh(t.entries().len(), t.revision(), 39));
    }

    #[test]
    fn transcript_taller_than_canvas_renders_newest() {
        let t = tall_transcript();
        let mut state = MessageListState::new();
        let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();

        for _ in 0..2 {
            terminal
                .draw(|f| MessageList::new(&mut state, &t, 0).render(f, f.area()))
                .unwrap();
        }

        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(screen.contains("newest"));
        assert!(state.stick_to_bottom);
    }
}
