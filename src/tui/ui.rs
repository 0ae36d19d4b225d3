use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::input_box;
use crate::tui::components::{MessageList, TitleBar};

/// Draws the whole screen: title bar, transcript, input.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, tick: usize) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(input_box::HEIGHT)]);
    let [title_area, main_area, input_area] = layout.areas(frame.area());

    MessageList::new(&mut tui.message_list, &app.transcript, tick).render(frame, main_area);

    // Read after the list render so a new entry clears the hint on the same frame
    TitleBar::new(
        app.backend.name().to_string(),
        app.status_message.clone(),
        !tui.message_list.stick_to_bottom,
    )
    .render(frame, title_area);

    tui.input_box.render(frame, input_area);
}
