use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Widget};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::media::{MediaItem, format_size};

/// Renders one collage entry as a compact card (2-3 lines).
///
/// Layout:
///   #3  Cat Kitten GIF
///   https://media.giphy.com/.../giphy.mp4
///   ▶ ready · 1.0 MB
///
/// Until the asset has loaded the card is dimmed.
pub struct MediaCard<'a> {
    pub media: &'a MediaItem,
    pub position: usize,
    pub selected: bool,
}

impl<'a> MediaCard<'a> {
    pub fn new(media: &'a MediaItem, position: usize) -> Self {
        Self {
            media,
            position,
            selected: false,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

/// Number of lines a card needs.
pub fn media_card_height(media: &MediaItem) -> u16 {
    if media.item.title.is_empty() { 2 } else { 3 }
}

impl Widget for MediaCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let base = if self.media.is_ready() {
            Style::default().fg(Color::White)
        } else {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM)
        };
        let accent = if self.selected {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            base
        };
        let width = area.width as usize;

        let mut lines = Vec::with_capacity(3);
        let marker = if self.selected { "\u{25b8}" } else { " " };
        let heading = if self.media.item.title.is_empty() {
            self.media.item.url.as_str()
        } else {
            self.media.item.title.as_str()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}#{} ", self.position + 1), accent),
            Span::styled(truncate(heading, width.saturating_sub(6)), accent),
        ]));
        if !self.media.item.title.is_empty() {
            lines.push(Line::from(Span::styled(
                truncate(&self.media.item.url, width),
                base.add_modifier(Modifier::UNDERLINED),
            )));
        }
        let status = if self.media.is_ready() {
            match self.media.size_bytes() {
                Some(size) => format!("\u{25b6} ready \u{00b7} {}", format_size(size)),
                None => "\u{25b6} ready".to_string(),
            }
        } else {
            "\u{2026} buffering".to_string()
        };
        let status_style = if self.media.is_ready() {
            Style::default().fg(Color::Green)
        } else {
            base
        };
        lines.push(Line::from(Span::styled(status, status_style)));

        for (i, line) in lines.iter().enumerate() {
            let y = area.y + i as u16;
            if y >= area.y + area.height {
                break;
            }
            buf.set_line(area.x, y, line, area.width);
        }
    }
}

/// Cut `s` to at most `max_width` columns, ending in an ellipsis if cut.
fn truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('\u{2026}');
    out
}

/// The collage: every accepted result, oldest first.
pub struct MediaStack<'a> {
    pub items: &'a [MediaItem],
    /// Highlighted entry, if the results have focus.
    pub selected: Option<usize>,
}

impl<'a> MediaStack<'a> {
    pub fn new(items: &'a [MediaItem]) -> Self {
        Self {
            items,
            selected: None,
        }
    }

    pub fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }
}

impl Widget for MediaStack<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let ready = self.items.iter().filter(|m| m.is_ready()).count();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {ready}/{} ", self.items.len()))
            .title_style(Style::default().fg(Color::Magenta))
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.items.is_empty() {
            return;
        }

        let content_width = inner.width.saturating_sub(1); // 1 char left margin
        let heights: Vec<u16> = self
            .items
            .iter()
            .map(|m| media_card_height(m) + 1)
            .collect();

        // Without a selection, keep the newest entry in view.
        let anchor = self.selected.unwrap_or(self.items.len() - 1);
        let scroll_start = compute_scroll_start(&heights, anchor, inner.height);

        let mut y = inner.y;
        let mut idx = scroll_start;
        while idx < self.items.len() && y < inner.y + inner.height {
            let card_h = heights[idx];
            let remaining = inner.y + inner.height - y;
            let render_h = card_h.min(remaining);

            let card_area = Rect::new(inner.x + 1, y, content_width, render_h.saturating_sub(1));
            MediaCard::new(&self.items[idx], idx)
                .selected(self.selected == Some(idx))
                .render(card_area, buf);

            y += render_h;
            idx += 1;
        }
    }
}

/// Find the smallest scroll start index so that the anchored item fits
/// within the available height.
fn compute_scroll_start(heights: &[u16], anchor: usize, available: u16) -> usize {
    if heights.is_empty() {
        return 0;
    }

    let anchor = anchor.min(heights.len() - 1);
    if available == 0 {
        return anchor;
    }

    let mut start = anchor;
    let mut used = heights[anchor];

    while start > 0 {
        let next = used.saturating_add(heights[start - 1]);
        if next > available {
            break;
        }
        start -= 1;
        used = next;
    }

    start
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::ResultItem;

    fn media(key: u64, title: &str) -> MediaItem {
        MediaItem::new(
            key,
            ResultItem {
                id: key.to_string(),
                url: format!("https://media.giphy.com/{key}.mp4"),
                title: title.into(),
                page_url: None,
            },
        )
    }

    fn rendered(widget: impl Widget, width: u16, height: u16) -> Vec<String> {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn handles_empty_stack() {
        assert_eq!(compute_scroll_start(&[], 0, 10), 0);
    }

    #[test]
    fn advances_when_anchor_is_below_exactly_full_window() {
        let heights = [5, 5, 5];
        assert_eq!(compute_scroll_start(&heights, 2, 10), 1);
    }

    #[test]
    fn keeps_anchor_visible_when_it_is_taller_than_viewport() {
        let heights = [3, 12, 4];
        assert_eq!(compute_scroll_start(&heights, 1, 8), 1);
    }

    #[test]
    fn clamps_anchor_to_last_item() {
        let heights = [2, 2, 2];
        assert_eq!(compute_scroll_start(&heights, 99, 4), 1);
    }

    #[test]
    fn card_height_depends_on_title() {
        assert_eq!(media_card_height(&media(0, "")), 2);
        assert_eq!(media_card_height(&media(0, "Cat GIF")), 3);
    }

    #[test]
    fn card_shows_loading_state() {
        let mut item = media(0, "Cat GIF");
        let lines = rendered(MediaCard::new(&item, 0), 50, 3);
        assert!(lines[0].contains("#1 Cat GIF"));
        assert!(lines[2].contains("buffering"));

        item.mark_ready(Some(2048));
        let lines = rendered(MediaCard::new(&item, 0), 50, 3);
        assert!(lines[2].contains("ready"));
        assert!(lines[2].contains("2.0 KB"));
    }

    #[test]
    fn stack_keeps_newest_in_view() {
        let items: Vec<MediaItem> = (0..10).map(|k| media(k, "")).collect();
        let lines = rendered(MediaStack::new(&items), 60, 8).join("\n");
        assert!(lines.contains("#10"));
        assert!(!lines.contains("#1 "));
    }

    #[test]
    fn stack_title_counts_ready_items() {
        let mut items: Vec<MediaItem> = (0..3).map(|k| media(k, "")).collect();
        items[1].mark_ready(None);
        let lines = rendered(MediaStack::new(&items), 60, 12);
        assert!(lines[0].contains("1/3"));
    }

    #[test]
    fn truncates_with_ellipsis() {
        assert_eq!(truncate("abcdef", 4), "abc\u{2026}");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
