//! Domain events emitted by the Engine for external consumers
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`. The headless runner turns them into NDJSON.

use ideck_core::TabId;

/// Domain events emitted by the Engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Health check and overview both succeeded
    PageReady,

    /// The initial load failed; the page shows the error banner
    PageFailed { message: String },

    /// A tab's payload was cached (first load or refresh)
    TabLoaded { tab: TabId, field_count: usize },

    /// A tab's fetch failed
    TabFailed {
        tab: TabId,
        reason: String,
        attempts: u32,
    },

    /// The engine is shutting down
    Shutdown,
}

impl EngineEvent {
    /// Stable event name for logging and serialization.
    pub fn event_type(&self) -> &'static str {
        match self {
            EngineEvent::PageReady => "page_ready",
            EngineEvent::PageFailed { .. } => "page_error",
            EngineEvent::TabLoaded { .. } => "tab_loaded",
            EngineEvent::TabFailed { .. } => "tab_failed",
            EngineEvent::Shutdown => "shutdown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_labels() {
        assert_eq!(EngineEvent::PageReady.event_type(), "page_ready");
        assert_eq!(
            EngineEvent::PageFailed {
                message: "x".into()
            }
            .event_type(),
            "page_error"
        );
        assert_eq!(
            EngineEvent::TabLoaded {
                tab: TabId::Concepts,
                field_count: 1
            }
            .event_type(),
            "tab_loaded"
        );
    }
}
