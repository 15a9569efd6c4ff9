//! Tab bar: one entry per dashboard section with its load glyph

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Tabs, Widget},
};

use ideck_app::AppState;
use ideck_core::TabId;

use crate::theme::{icons, styles};

pub struct TabBar<'a> {
    state: &'a AppState,
}

impl<'a> TabBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn titles(&self) -> Vec<Line<'static>> {
        TabId::ALL
            .iter()
            .map(|&tab| {
                let load = self.state.tab_load(tab);
                let glyph_style = match load {
                    ideck_app::TabLoad::Failed { .. } => styles::status_red(),
                    ideck_app::TabLoad::Loaded => styles::status_green(),
                    _ => styles::text_muted(),
                };
                Line::from(vec![
                    Span::styled(format!("{} ", tab.hotkey()), styles::keybinding()),
                    Span::raw(tab.label()),
                    Span::raw(" "),
                    Span::styled(icons::tab_status(load, self.state.tick), glyph_style),
                ])
            })
            .collect()
    }
}

impl Widget for TabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let selected = self.state.active_tab.index();
        Tabs::new(self.titles())
            .select(selected)
            .style(styles::text_primary())
            .highlight_style(styles::focused_selected())
            .divider("│")
            .render(area, buf);
    }
}
