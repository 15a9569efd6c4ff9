//! Message types for the application (TEA pattern)

use ideck_core::{TabId, TabPayload};

use crate::input_key::InputKey;
use crate::state::RequestGeneration;

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Tick event for periodic updates
    Tick,

    /// Quit the application
    Quit,

    // ─────────────────────────────────────────────────────────
    // Initial Load
    // ─────────────────────────────────────────────────────────
    /// Page mounted: check backend health, then load the overview
    Start,

    /// Restart the initial load after it failed
    RetryInitialLoad,

    /// Health check answered with a success envelope
    HealthCheckSucceeded { generation: RequestGeneration },

    /// Health check failed (transport, non-2xx or non-success envelope)
    HealthCheckFailed {
        generation: RequestGeneration,
        error: String,
    },

    // ─────────────────────────────────────────────────────────
    // Tabs
    // ─────────────────────────────────────────────────────────
    /// Make a tab active and lazily load it
    SelectTab(TabId),
    /// Select the tab to the right (wraps)
    NextTab,
    /// Select the tab to the left (wraps)
    PrevTab,

    /// Retry a failed tab, honouring the backoff policy
    RetryTab(TabId),

    /// Re-fetch a loaded tab, keeping the cached payload visible meanwhile
    RefreshTab(TabId),

    /// A tab fetch completed with a success envelope
    TabFetched {
        tab: TabId,
        generation: RequestGeneration,
        payload: TabPayload,
    },

    /// A tab fetch failed
    TabFetchFailed {
        tab: TabId,
        generation: RequestGeneration,
        error: String,
    },
}
