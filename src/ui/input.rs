use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

/// A simple single-line text input renderer.
///
/// Renders the prompt + text content, with a cursor block at the end while
/// focused. Shows the placeholder when the text is empty.
pub struct TextInput<'a> {
    pub prompt: &'a str,
    pub text: &'a str,
    pub placeholder: &'a str,
    pub focused: bool,
    pub style: Style,
}

impl<'a> TextInput<'a> {
    pub fn new(prompt: &'a str, text: &'a str) -> Self {
        Self {
            prompt,
            text,
            placeholder: "",
            focused: true,
            style: Style::default().fg(Color::White),
        }
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let cursor = if self.focused { "\u{2588}" } else { "" };
        let prompt_style = if self.focused {
            Style::default().fg(Color::Magenta)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        if self.text.is_empty() {
            let (x, _) = buf.set_stringn(
                area.x,
                area.y,
                self.prompt,
                area.width as usize,
                prompt_style,
            );
            let remaining = (area.x + area.width).saturating_sub(x) as usize;
            let (x, _) = buf.set_stringn(x, area.y, cursor, remaining, self.style);
            let remaining = (area.x + area.width).saturating_sub(x) as usize;
            buf.set_stringn(
                x,
                area.y,
                self.placeholder,
                remaining,
                Style::default().fg(Color::DarkGray),
            );
            return;
        }

        let display = format!("{}{}{}", self.prompt, self.text, cursor);
        let visible = tail_fitting(&display, area.width as usize);
        buf.set_string(area.x, area.y, visible, self.style);
    }
}

/// The longest suffix of `s` whose display width fits in `max_width`.
fn tail_fitting(s: &str, max_width: usize) -> &str {
    let mut start = 0;
    for (idx, _) in s.char_indices() {
        if s[idx..].width() <= max_width {
            start = idx;
            break;
        }
        start = s.len();
    }
    &s[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(input: TextInput<'_>, width: u16) -> String {
        let area = Rect::new(0, 0, width, 1);
        let mut buf = Buffer::empty(area);
        input.render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn shows_placeholder_when_empty() {
        let text = rendered(TextInput::new("> ", "").placeholder("Type something"), 30);
        assert!(text.contains("Type something"));
    }

    #[test]
    fn shows_text_instead_of_placeholder() {
        let text = rendered(TextInput::new("> ", "cats").placeholder("Type something"), 30);
        assert!(text.starts_with("> cats\u{2588}"));
        assert!(!text.contains("Type something"));
    }

    #[test]
    fn no_cursor_when_unfocused() {
        let text = rendered(TextInput::new("> ", "cats").focused(false), 30);
        assert!(!text.contains('\u{2588}'));
    }

    #[test]
    fn long_text_keeps_the_tail() {
        assert_eq!(tail_fitting("abcdef", 3), "def");
        assert_eq!(tail_fitting("abc", 10), "abc");
        // Wide chars are two columns each.
        assert_eq!(tail_fitting("猫猫猫", 4), "猫猫");
    }
}
