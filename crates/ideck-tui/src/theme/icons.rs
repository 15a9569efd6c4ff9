//! Status glyphs and spinner frames

use ideck_app::TabLoad;

pub const NOT_REQUESTED: &str = "○";
pub const LOADED: &str = "●";
pub const FAILED: &str = "✗";

const SPINNER: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

/// Spinner frame for the given tick.
pub fn spinner(tick: u64) -> &'static str {
    SPINNER[(tick % SPINNER.len() as u64) as usize]
}

/// Glyph shown next to a tab title.
pub fn tab_status(load: &TabLoad, tick: u64) -> &'static str {
    match load {
        TabLoad::NotRequested => NOT_REQUESTED,
        TabLoad::Loading { .. } => spinner(tick),
        TabLoad::Loaded => LOADED,
        TabLoad::Failed { .. } => FAILED,
    }
}
