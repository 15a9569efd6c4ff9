//! Headless mode - NDJSON event output instead of the TUI
//!
//! Runs the same engine as the TUI, loads the overview, then every other
//! tab once, and writes one JSON object per line as things happen.
//! Useful for scripting against a backend and for end-to-end tests.
//!
//! # Example Output
//!
//! ```json
//! {"event":"page_ready","base_url":"http://127.0.0.1:8000","timestamp":1704700001000}
//! {"event":"tab_loaded","tab":"overview","field_count":4,"timestamp":1704700001020}
//! {"event":"tab_failed","tab":"agents","reason":"HTTP 503","attempts":1,"will_retry":true,"timestamp":1704700001100}
//! {"event":"finished","loaded":8,"failed":1,"timestamp":1704700003000}
//! ```

pub mod runner;

use std::io::Write;

use chrono::Utc;
use ideck_core::TabId;
use serde::Serialize;
use tracing::error;

pub use runner::{run_headless, HeadlessSummary};

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// Health check and overview succeeded
    PageReady { base_url: String, timestamp: i64 },

    /// The initial load failed; nothing else will be fetched
    PageError { message: String, timestamp: i64 },

    /// A tab's payload arrived
    TabLoaded {
        tab: &'static str,
        field_count: usize,
        timestamp: i64,
    },

    /// A tab's fetch failed
    TabFailed {
        tab: &'static str,
        reason: String,
        attempts: u32,
        will_retry: bool,
        timestamp: i64,
    },

    /// Every tab has settled (or the page failed)
    Finished {
        loaded: usize,
        failed: usize,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Write this event as one NDJSON line and flush.
    ///
    /// Output errors are logged, not propagated: a closed pipe must not
    /// abort the run.
    pub fn emit(&self, out: &mut impl Write) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        if let Err(e) = writeln!(out, "{}", json).and_then(|_| out.flush()) {
            error!("Failed to write headless event: {}", e);
        }
    }

    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn page_ready(base_url: &str) -> Self {
        Self::PageReady {
            base_url: base_url.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn page_error(message: String) -> Self {
        Self::PageError {
            message,
            timestamp: Self::now(),
        }
    }

    pub fn tab_loaded(tab: TabId, field_count: usize) -> Self {
        Self::TabLoaded {
            tab: tab.as_str(),
            field_count,
            timestamp: Self::now(),
        }
    }

    pub fn tab_failed(tab: TabId, reason: String, attempts: u32, will_retry: bool) -> Self {
        Self::TabFailed {
            tab: tab.as_str(),
            reason,
            attempts,
            will_retry,
            timestamp: Self::now(),
        }
    }

    pub fn finished(summary: &HeadlessSummary) -> Self {
        Self::Finished {
            loaded: summary.loaded,
            failed: summary.failed,
            timestamp: Self::now(),
        }
    }
}
