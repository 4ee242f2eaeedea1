use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::search::Hint;

const SPINNER: [&str; 10] = [
    "\u{280b}", "\u{2819}", "\u{2839}", "\u{2838}", "\u{283c}", "\u{2834}", "\u{2826}", "\u{2827}",
    "\u{2807}", "\u{280f}",
];

/// Status line under the input: a busy spinner, else the hint. Busy wins.
pub struct StatusHint<'a> {
    pub busy: bool,
    pub hint: &'a Hint,
    /// Animation frame, advanced by ticks.
    pub frame: usize,
}

impl<'a> StatusHint<'a> {
    pub fn new(busy: bool, hint: &'a Hint) -> Self {
        Self {
            busy,
            hint,
            frame: 0,
        }
    }

    pub fn frame(mut self, frame: usize) -> Self {
        self.frame = frame;
        self
    }
}

impl Widget for StatusHint<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let line = if self.busy {
            Line::from(vec![
                Span::styled(
                    SPINNER[self.frame % SPINNER.len()],
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(" searching", Style::default().fg(Color::DarkGray)),
            ])
        } else {
            let style = if self.hint.is_error() {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC)
            };
            Line::from(Span::styled(self.hint.text(), style))
        };

        Paragraph::new(line).centered().render(area, buf);
    }
}
