//! Screen layout definitions for the TUI

use ratatui::layout::{Constraint, Layout, Rect};

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    /// Title, backend URL and connection status
    pub header: Rect,

    /// One entry per dashboard section
    pub tabs: Rect,

    /// Active panel or the page-level banner
    pub body: Rect,

    /// Key hints and transient status
    pub footer: Rect,
}

/// Split the terminal into header, tab bar, body and footer.
pub fn create(area: Rect) -> ScreenAreas {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Header (bordered)
        Constraint::Length(1), // Tab bar
        Constraint::Min(3),    // Body (bordered)
        Constraint::Length(1), // Footer
    ])
    .split(area);

    ScreenAreas {
        header: chunks[0],
        tabs: chunks[1],
        body: chunks[2],
        footer: chunks[3],
    }
}
