pub mod header;
pub mod help;
pub mod input;
pub mod media;
pub mod status_hint;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::app::App;
use crate::search::Focus;

use header::SearchHeader;
use help::HelpView;
use input::TextInput;
use media::MediaStack;
use status_hint::StatusHint;

const PLACEHOLDER: &str = "Type something";

/// Rows taken by [`SearchHeader`] at the top of the screen.
pub const HEADER_HEIGHT: u16 = 1;

pub fn draw(frame: &mut Frame, app: &App) {
    let search = &app.search;

    // Layout: header + collage + input + status hint
    let [header_area, stack_area, input_area, hint_area] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(SearchHeader::new(search.has_results()), header_area);

    let selected = (search.focus == Focus::Results).then_some(app.selected_index);
    frame.render_widget(
        MediaStack::new(&search.results).selected(selected),
        stack_area,
    );

    frame.render_widget(
        TextInput::new("> ", &search.query)
            .placeholder(PLACEHOLDER)
            .focused(search.focus == Focus::Input && !app.show_help),
        input_area,
    );

    frame.render_widget(
        StatusHint::new(search.busy, &search.hint).frame(app.spinner_frame),
        hint_area,
    );

    if app.show_help {
        frame.render_widget(HelpView::new(), frame.area());
    }
}
