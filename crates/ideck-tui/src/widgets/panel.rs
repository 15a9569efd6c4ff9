//! Panel body for the active tab

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, Widget, Wrap},
};

use ideck_app::{FieldRow, PanelView};
use ideck_core::TabId;

use crate::theme::{icons, styles};

/// Width of the label column in the field table
const LABEL_WIDTH: u16 = 24;

/// Spinner with a "Loading ..." line, used before any payload exists.
pub struct LoadingPanel<'a> {
    title: &'a str,
    tick: u64,
}

impl<'a> LoadingPanel<'a> {
    pub fn new(title: &'a str, tick: u64) -> Self {
        Self { title, tick }
    }
}

impl Widget for LoadingPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(true).title(format!(" {} ", self.title));
        let line = Line::from(vec![
            Span::styled(icons::spinner(self.tick), styles::accent()),
            Span::styled(format!(" Loading {}…", self.title), styles::text_secondary()),
        ]);
        Paragraph::new(line).block(block).render(area, buf);
    }
}

/// Panel for one tab in any of its states.
pub struct TabPanel<'a> {
    tab: TabId,
    view: &'a PanelView,
    tick: u64,
}

impl<'a> TabPanel<'a> {
    pub fn new(tab: TabId, view: &'a PanelView, tick: u64) -> Self {
        Self { tab, view, tick }
    }
}

impl Widget for TabPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.view {
            PanelView::Loading => LoadingPanel::new(self.tab.label(), self.tick).render(area, buf),

            PanelView::Failed {
                reason,
                attempts,
                retry_hint,
            } => {
                let block = styles::error_block().title(format!(" {} ", self.tab.label()));
                let lines = vec![
                    Line::from(Span::styled(
                        format!("{} Failed to load {}", icons::FAILED, self.tab.label()),
                        styles::status_red(),
                    )),
                    Line::from(Span::styled(reason.clone(), styles::text_secondary())),
                    Line::from(Span::styled(
                        format!("Attempts: {attempts}"),
                        styles::text_muted(),
                    )),
                    Line::raw(""),
                    Line::from(Span::styled(retry_hint.clone(), styles::keybinding())),
                ];
                Paragraph::new(lines)
                    .wrap(Wrap { trim: true })
                    .block(block)
                    .render(area, buf);
            }

            PanelView::Loaded {
                rows,
                other_fields,
                fetched_at,
                refreshing,
                refresh_error,
            } => {
                let mut subtitle = format!("updated {}", fetched_at.format("%H:%M:%S"));
                if *refreshing {
                    subtitle.push_str(&format!(" {} refreshing", icons::spinner(self.tick)));
                }
                let mut block = styles::glass_block(true)
                    .title(format!(" {} ", self.tab.label()))
                    .title_bottom(Line::from(Span::styled(
                        format!(" {subtitle} "),
                        styles::text_muted(),
                    )));
                if let Some(error) = refresh_error {
                    block = block.title_bottom(
                        Line::from(Span::styled(
                            format!(" refresh failed: {error} "),
                            styles::status_red(),
                        ))
                        .right_aligned(),
                    );
                }

                let table_rows = rows
                    .iter()
                    .map(field_row)
                    .chain(
                        (!other_fields.is_empty())
                            .then(|| Row::new(vec![Cell::from(""), Cell::from("")])),
                    )
                    .chain(other_fields.iter().map(field_row));

                Table::new(
                    table_rows,
                    [Constraint::Length(LABEL_WIDTH), Constraint::Min(10)],
                )
                .block(block)
                .render(area, buf);
            }
        }
    }
}

fn field_row(row: &FieldRow) -> Row<'static> {
    let value_style = if row.synthesized {
        styles::synthesized()
    } else {
        styles::text_primary()
    };
    Row::new(vec![
        Cell::from(Span::styled(row.label.clone(), styles::text_secondary())),
        Cell::from(Span::styled(row.value.clone(), value_style)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::render_to_string;
    use chrono::Local;

    fn row(label: &str, value: &str, synthesized: bool) -> FieldRow {
        FieldRow {
            label: label.to_string(),
            value: value.to_string(),
            synthesized,
        }
    }

    #[test]
    fn test_loading_panel() {
        let content = render_to_string(60, 5, TabPanel::new(TabId::Agents, &PanelView::Loading, 0));
        assert!(content.contains("Loading Agents"));
    }

    #[test]
    fn test_loaded_panel_shows_values() {
        let view = PanelView::Loaded {
            rows: vec![
                row("Total concepts", "18", false),
                row("Concept clusters", "0", true),
            ],
            other_fields: vec![row("last sync", "today", false)],
            fetched_at: Local::now(),
            refreshing: false,
            refresh_error: None,
        };
        let content = render_to_string(60, 10, TabPanel::new(TabId::Concepts, &view, 0));

        assert!(content.contains("Concepts"));
        assert!(content.contains("Total concepts"));
        assert!(content.contains("18"));
        assert!(content.contains("last sync"));
        assert!(content.contains("updated"));
    }

    #[test]
    fn test_loaded_panel_shows_refresh_error() {
        let view = PanelView::Loaded {
            rows: vec![row("Total memories", "3", false)],
            other_fields: Vec::new(),
            fetched_at: Local::now(),
            refreshing: false,
            refresh_error: Some("HTTP 503".into()),
        };
        let content = render_to_string(80, 6, TabPanel::new(TabId::Memories, &view, 0));
        assert!(content.contains("refresh failed: HTTP 503"));
    }

    #[test]
    fn test_failed_panel_shows_reason_and_hint() {
        let view = PanelView::Failed {
            reason: "cannot connect to http://x/".into(),
            attempts: 2,
            retry_hint: "Press r to retry".into(),
        };
        let content = render_to_string(60, 10, TabPanel::new(TabId::Agents, &view, 0));

        assert!(content.contains("Failed to load Agents"));
        assert!(content.contains("cannot connect"));
        assert!(content.contains("Attempts: 2"));
        assert!(content.contains("Press r to retry"));
    }
}
