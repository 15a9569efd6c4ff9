//! Page-level error banner shown when the initial load fails

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::theme::{icons, styles};

pub struct ErrorBanner<'a> {
    message: &'a str,
    retry_hint: &'a str,
}

impl<'a> ErrorBanner<'a> {
    pub fn new(message: &'a str, retry_hint: &'a str) -> Self {
        Self {
            message,
            retry_hint,
        }
    }
}

impl Widget for ErrorBanner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::error_block().title(" Unable to load insights ");
        let lines = vec![
            Line::raw(""),
            Line::from(Span::styled(
                format!("{} {}", icons::FAILED, self.message),
                styles::status_red(),
            )),
            Line::raw(""),
            Line::from(Span::styled(self.retry_hint.to_string(), styles::keybinding())),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}
