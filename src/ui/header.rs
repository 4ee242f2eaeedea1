use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

/// Top bar: the app title, or the reset control once results exist.
pub struct SearchHeader {
    pub has_results: bool,
}

impl SearchHeader {
    pub fn new(has_results: bool) -> Self {
        Self { has_results }
    }
}

impl Widget for SearchHeader {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let line = if self.has_results {
            Line::from(vec![
                Span::styled(
                    " \u{2715} Clear search ",
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" (Esc / click)", Style::default().fg(Color::DarkGray)),
            ])
        } else {
            Line::from(Span::styled(
                "Jiffy",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ))
        };

        Paragraph::new(line).centered().render(area, buf);
    }
}
