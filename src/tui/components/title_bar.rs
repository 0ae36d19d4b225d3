//! # TitleBar Component
//!
//! Single-line status bar: application name, the endpoint being talked to,
//! the current status, and a "↓ New" hint when the user has scrolled away
//! from the newest entry.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

/// Top status bar. Stateless; every field is a prop.
pub struct TitleBar {
    /// Backend description, e.g. `http://127.0.0.1:5000/get`
    pub endpoint: String,
    pub status_message: String,
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(endpoint: String, status_message: String, has_unseen_content: bool) -> Self {
        Self {
            endpoint,
            status_message,
            has_unseen_content,
        }
    }

    fn text(&self) -> String {
        let mut text = format!("Parley ({})", self.endpoint);
        if !self.status_message.is_empty() {
            text.push_str(" | ");
            text.push_str(&self.status_message);
        }
        if self.has_unseen_content {
            text.push_str(" | ↓ New");
        }
        text
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Span::raw(self.text()), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(title_bar: &mut TitleBar) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        terminal.draw(|f| title_bar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn shows_endpoint_and_status() {
        let mut title_bar = TitleBar::new(
            "http://localhost:5000/get".into(),
            "Waiting for reply...".into(),
            false,
        );
        let text = rendered(&mut title_bar);
        assert!(text.contains("Parley"));
        assert!(text.contains("localhost:5000/get"));
        assert!(text.contains("Waiting for reply..."));
        assert!(!text.contains("↓ New"));
    }

    #[test]
    fn empty_status_has_no_separator() {
        let title_bar = TitleBar::new("http://x/get".into(), String::new(), false);
        assert_eq!(title_bar.text(), "Parley (http://x/get)");
    }

    #[test]
    fn unseen_content_hint() {
        let title_bar = TitleBar::new("http://x/get".into(), String::new(), true);
        assert_eq!(title_bar.text(), "Parley (http://x/get) | ↓ New");
    }
}
