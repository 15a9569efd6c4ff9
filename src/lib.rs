//! Insights Deck Library
//!
//! A terminal dashboard that lazily loads per-tab data from an insights
//! REST backend. The binary picks the TUI or the headless runner.

pub mod headless;

use ideck_app::config::Settings;
use ideck_app::Engine;
use ideck_client::HttpInsightsClient;
use ideck_core::prelude::*;

// Re-export main entry points
pub use headless::{run_headless, HeadlessSummary};
pub use ideck_tui::run as run_tui;

/// Build an engine that talks HTTP to the backend described by `settings`.
pub fn build_engine(settings: Settings) -> Result<Engine<HttpInsightsClient>> {
    let endpoints = settings.endpoint_table()?;
    info!("Backend base URL: {}", endpoints.base_url());
    let client = HttpInsightsClient::new(endpoints, settings.client_options())?;
    Ok(Engine::new(settings, client))
}

/// User-facing advice for errors that end the program.
pub fn fatal_hint(err: &Error) -> Option<&'static str> {
    if !err.is_fatal() {
        return None;
    }
    match err {
        Error::InvalidUrl { .. } => {
            Some("Set [server] base_url in config.toml or pass --base-url http://host:port")
        }
        Error::TerminalInit(_) => Some("ideck needs an interactive terminal; try --headless"),
        _ => None,
    }
}
