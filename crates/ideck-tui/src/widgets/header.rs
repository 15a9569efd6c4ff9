//! Header bar: title, backend URL and connection status

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use ideck_app::PageStatus;

use crate::theme::{icons, styles};

pub struct MainHeader<'a> {
    base_url: &'a str,
    page: &'a PageStatus,
    tick: u64,
}

impl<'a> MainHeader<'a> {
    pub fn new(base_url: &'a str, page: &'a PageStatus, tick: u64) -> Self {
        Self {
            base_url,
            page,
            tick,
        }
    }
}

impl Widget for MainHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let title = Line::from(vec![
            Span::styled("Insights Deck", styles::accent_bold()),
            Span::styled("  ", styles::text_muted()),
            Span::styled(self.base_url.to_string(), styles::text_secondary()),
        ]);
        Paragraph::new(title).render(inner, buf);

        let glyph = if self.page.is_loading() {
            icons::spinner(self.tick)
        } else {
            icons::LOADED
        };
        let status = Line::from(vec![
            Span::styled(glyph, styles::page_status(self.page)),
            Span::raw(" "),
            Span::styled(self.page.label(), styles::page_status(self.page)),
        ]);
        Paragraph::new(status)
            .alignment(Alignment::Right)
            .render(inner, buf);
    }
}
