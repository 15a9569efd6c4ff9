//! Custom widget components

mod error_banner;
mod footer;
mod header;
mod panel;
mod tab_bar;

pub use error_banner::ErrorBanner;
pub use footer::Footer;
pub use header::MainHeader;
pub use panel::{LoadingPanel, TabPanel};
pub use tab_bar::TabBar;

#[cfg(test)]
pub(crate) fn render_to_string(
    width: u16,
    height: u16,
    widget: impl ratatui::widgets::Widget,
) -> String {
    use ratatui::{backend::TestBackend, Terminal};

    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal
        .draw(|f| f.render_widget(widget, f.area()))
        .unwrap();
    let buffer = terminal.backend().buffer();
    buffer.content().iter().map(|c| c.symbol()).collect()
}
