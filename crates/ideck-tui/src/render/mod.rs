//! Main render/view function (View in TEA pattern)


use ideck_app::{page_view, AppState, PageView};
use ideck_core::TabId;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

use super::{layout, widgets};
use crate::theme::palette;

/// Render the complete UI.
///
/// Pure: reads state, never mutates it.
pub fn view(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    let bg_block = Block::default().style(Style::default().bg(palette::DEEPEST_BG));
    frame.render_widget(bg_block, area);

    let areas = layout::create(area);

    frame.render_widget(
        widgets::MainHeader::new(&state.settings.server.base_url, &state.page, state.tick),
        areas.header,
    );
    frame.render_widget(widgets::TabBar::new(state), areas.tabs);

    match page_view(state) {
        PageView::Error {
            message,
            retry_hint,
        } => frame.render_widget(widgets::ErrorBanner::new(&message, &retry_hint), areas.body),
        // The initial load always ends with the overview
        PageView::Loading => frame.render_widget(
            widgets::LoadingPanel::new(TabId::Overview.label(), state.tick),
            areas.body,
        ),
        PageView::Panel(panel) => frame.render_widget(
            widgets::TabPanel::new(state.active_tab, &panel, state.tick),
            areas.body,
        ),
    }

    frame.render_widget(
        widgets::Footer::new(state.status_message.as_deref()),
        areas.footer,
    );
}
