//! Footer: key hints, or the latest status message

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::styles;

const HINTS: [(&str, &str); 5] = [
    ("1-9", "tab"),
    ("←/→", "switch"),
    ("r", "retry"),
    ("R", "refresh"),
    ("q", "quit"),
];

pub struct Footer<'a> {
    status_message: Option<&'a str>,
}

impl<'a> Footer<'a> {
    pub fn new(status_message: Option<&'a str>) -> Self {
        Self { status_message }
    }
}

impl Widget for Footer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = match self.status_message {
            Some(message) => Line::from(Span::styled(
                format!(" {message}"),
                styles::status_yellow(),
            )),
            None => {
                let mut spans = vec![Span::raw(" ")];
                for (key, action) in HINTS {
                    spans.push(Span::styled(key, styles::keybinding()));
                    spans.push(Span::styled(format!(" {action}  "), styles::text_muted()));
                }
                Line::from(spans)
            }
        };
        Paragraph::new(line).render(area, buf);
    }
}
