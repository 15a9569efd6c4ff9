//! Application state (Model in TEA pattern)

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Local};
use ideck_core::{TabId, TabPayload};

use crate::config::Settings;

// ─────────────────────────────────────────────────────────────────────────────
// Request generations
// ─────────────────────────────────────────────────────────────────────────────

/// Tag attached to every dispatched request.
///
/// A completion is applied only while the target is still waiting on the
/// same generation; anything else is a stale result and is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestGeneration(pub u64);

impl fmt::Display for RequestGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Page status (initial load)
// ─────────────────────────────────────────────────────────────────────────────

/// Progress of the two-step initial load: health check, then overview.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageStatus {
    /// Nothing requested yet
    #[default]
    NotStarted,

    /// Waiting on the health check
    CheckingHealth { generation: RequestGeneration },

    /// Health check passed, waiting on the overview payload
    FetchingOverview { generation: RequestGeneration },

    /// Overview cached; tabs load on selection
    Ready,

    /// Health check or overview failed; only `RetryInitialLoad` leaves this state
    Error { message: String },
}

impl PageStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, PageStatus::Ready)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, PageStatus::Error { .. })
    }

    /// Initial load in flight
    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            PageStatus::CheckingHealth { .. } | PageStatus::FetchingOverview { .. }
        )
    }

    /// Short label for the header
    pub fn label(&self) -> &'static str {
        match self {
            PageStatus::NotStarted => "Idle",
            PageStatus::CheckingHealth { .. } => "Connecting",
            PageStatus::FetchingOverview { .. } => "Loading overview",
            PageStatus::Ready => "Connected",
            PageStatus::Error { .. } => "Error",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Per-tab load status and cache
// ─────────────────────────────────────────────────────────────────────────────

/// Load status of one tab.
///
/// Kept separate from [`TabCache`] so that the cache only ever holds
/// successful payloads while "never requested" and "failed" stay
/// distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TabLoad {
    #[default]
    NotRequested,

    /// A fetch is in flight. `attempt` is 1-based within the current
    /// retry series.
    Loading {
        generation: RequestGeneration,
        attempt: u32,
    },

    Loaded,

    /// The last fetch failed after `attempts` consecutive tries.
    Failed { reason: String, attempts: u32 },
}

impl TabLoad {
    pub fn is_loading(&self) -> bool {
        matches!(self, TabLoad::Loading { .. })
    }

    /// Generation of the in-flight request, if any.
    pub fn pending_generation(&self) -> Option<RequestGeneration> {
        match self {
            TabLoad::Loading { generation, .. } => Some(*generation),
            _ => None,
        }
    }
}

/// A successfully fetched payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedPayload {
    pub payload: TabPayload,
    pub fetched_at: DateTime<Local>,
    pub generation: RequestGeneration,
}

/// Per-tab cache of successful payloads.
///
/// Lives as long as the [`AppState`] that owns it. No eviction, no expiry:
/// an entry is only ever replaced by a newer successful fetch.
#[derive(Debug, Clone, Default)]
pub struct TabCache {
    entries: HashMap<TabId, CachedPayload>,
}

impl TabCache {
    pub fn get(&self, tab: TabId) -> Option<&CachedPayload> {
        self.entries.get(&tab)
    }

    pub fn contains(&self, tab: TabId) -> bool {
        self.entries.contains_key(&tab)
    }

    pub fn insert(&mut self, tab: TabId, entry: CachedPayload) {
        self.entries.insert(tab, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AppState
// ─────────────────────────────────────────────────────────────────────────────

/// Complete application state (the Model in TEA)
#[derive(Debug)]
pub struct AppState {
    pub settings: Settings,

    /// Currently displayed tab
    pub active_tab: TabId,

    /// Initial load progress
    pub page: PageStatus,

    /// Successful payloads
    pub cache: TabCache,

    /// Load status per tab; absent means [`TabLoad::NotRequested`]
    loads: HashMap<TabId, TabLoad>,

    /// Last generation handed out
    generation: u64,

    /// Transient message for the footer (retry refused, retry scheduled...)
    pub status_message: Option<String>,

    /// Tick counter driving the loading spinner
    pub tick: u64,

    quitting: bool,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            active_tab: settings.behavior.default_tab,
            settings,
            page: PageStatus::default(),
            cache: TabCache::default(),
            loads: HashMap::new(),
            generation: 0,
            status_message: None,
            tick: 0,
            quitting: false,
        }
    }

    /// Allocate a fresh request generation.
    pub fn next_generation(&mut self) -> RequestGeneration {
        self.generation += 1;
        RequestGeneration(self.generation)
    }

    pub fn tab_load(&self, tab: TabId) -> &TabLoad {
        const NOT_REQUESTED: &TabLoad = &TabLoad::NotRequested;
        self.loads.get(&tab).unwrap_or(NOT_REQUESTED)
    }

    pub fn set_tab_load(&mut self, tab: TabId, load: TabLoad) {
        self.loads.insert(tab, load);
    }

    /// Whether a completion for `tab` tagged `generation` is still wanted.
    pub fn accepts(&self, tab: TabId, generation: RequestGeneration) -> bool {
        self.tab_load(tab).pending_generation() == Some(generation)
    }

    /// Every tab has either a cached payload or a final failure.
    pub fn all_tabs_settled(&self) -> bool {
        TabId::ALL.iter().all(|&tab| match self.tab_load(tab) {
            TabLoad::Loading { .. } => false,
            TabLoad::Failed { .. } => true,
            TabLoad::NotRequested | TabLoad::Loaded => self.cache.contains(tab),
        })
    }

    pub fn request_quit(&mut self) {
        self.quitting = true;
    }

    pub fn should_quit(&self) -> bool {
        self.quitting
    }
}
