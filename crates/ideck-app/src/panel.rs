//! Panel view model
//!
//! [`panel_view`] projects the state of one tab into a [`PanelView`] the
//! renderer can draw without looking at the cache or load status itself.
//! Each tab has a fixed list of headline fields; a field the backend didn't
//! send is shown with a sample value, flagged as synthesized.

use chrono::{DateTime, Local};
use ideck_core::{display_value, TabId, TabPayload};

use crate::state::{AppState, PageStatus, TabLoad};

/// Placeholder shown for a missing field when sample values are disabled.
pub const MISSING_VALUE: &str = "—";

/// A headline field of a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub label: &'static str,
    /// Dotted path into the payload
    pub path: &'static str,
    /// Sample value used when the payload lacks the field
    pub fallback: &'static str,
}

const fn field(label: &'static str, path: &'static str, fallback: &'static str) -> FieldSpec {
    FieldSpec {
        label,
        path,
        fallback,
    }
}

const OVERVIEW_FIELDS: &[FieldSpec] = &[
    field("Total concepts", "total_concepts", "0"),
    field("Total memories", "total_memories", "0"),
    field("Active agents", "active_agents", "0"),
    field("Consciousness level", "consciousness_level", "0.00"),
    field("System health", "system_health", "unknown"),
];

const CONCEPTS_FIELDS: &[FieldSpec] = &[
    field("Total concepts", "total_concepts", "0"),
    field("Active concepts", "active_concepts", "0"),
    field("Concept clusters", "concept_clusters", "0"),
    field("Avg. connections", "average_connections", "0.00"),
    field("Newest concept", "newest_concept.name", "n/a"),
];

const MEMORIES_FIELDS: &[FieldSpec] = &[
    field("Total memories", "total_memories", "0"),
    field("Short-term", "short_term_count", "0"),
    field("Long-term", "long_term_count", "0"),
    field("Consolidation rate", "consolidation_rate", "0.00"),
    field("Avg. retrieval (ms)", "average_retrieval_ms", "0"),
];

const EVOLUTION_FIELDS: &[FieldSpec] = &[
    field("Current level", "current_level", "0.00"),
    field("Growth rate", "growth_rate", "0.00"),
    field("Milestones", "milestones", "0 items"),
    field("Evolution stage", "stage", "initial"),
];

const PERFORMANCE_FIELDS: &[FieldSpec] = &[
    field("Avg. response (ms)", "response_time_ms", "0"),
    field("Throughput (req/s)", "throughput", "0.00"),
    field("CPU usage (%)", "cpu_usage", "0.00"),
    field("Memory usage (%)", "memory_usage", "0.00"),
    field("Error rate", "error_rate", "0.00"),
];

const REALTIME_FIELDS: &[FieldSpec] = &[
    field("Awareness level", "awareness_level", "0.00"),
    field("Active thoughts", "active_thoughts", "0"),
    field("Attention focus", "attention_focus", "idle"),
    field("Last update", "timestamp", "never"),
];

const KNOWLEDGE_GRAPH_FIELDS: &[FieldSpec] = &[
    field("Nodes", "graph_stats.nodes", "0"),
    field("Relationships", "graph_stats.relationships", "0"),
    field("Density", "graph_stats.density", "0.00"),
    field("Communities", "communities", "0 items"),
    field("Central concept", "central_concepts.0.name", "n/a"),
];

const AGENTS_FIELDS: &[FieldSpec] = &[
    field("Total agents", "total_agents", "0"),
    field("Active agents", "active_agents", "0"),
    field("Avg. success rate", "average_success_rate", "0.00"),
    field("Top agent", "top_agent.name", "n/a"),
];

const DEEP_ANALYTICS_FIELDS: &[FieldSpec] = &[
    field("Insights generated", "insights_generated", "0"),
    field("Pattern count", "patterns.count", "0"),
    field("Anomalies", "anomalies", "0 items"),
    field("Prediction accuracy", "prediction_accuracy", "0.00"),
    field("Recommendations", "recommendations", "0 items"),
];

/// Headline fields shown for `tab`, in display order.
pub fn field_specs(tab: TabId) -> &'static [FieldSpec] {
    match tab {
        TabId::Overview => OVERVIEW_FIELDS,
        TabId::Concepts => CONCEPTS_FIELDS,
        TabId::Memories => MEMORIES_FIELDS,
        TabId::Evolution => EVOLUTION_FIELDS,
        TabId::Performance => PERFORMANCE_FIELDS,
        TabId::Realtime => REALTIME_FIELDS,
        TabId::KnowledgeGraph => KNOWLEDGE_GRAPH_FIELDS,
        TabId::Agents => AGENTS_FIELDS,
        TabId::DeepAnalytics => DEEP_ANALYTICS_FIELDS,
    }
}

/// One rendered field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    pub label: String,
    pub value: String,
    /// The value is a sample, not backend data
    pub synthesized: bool,
}

/// What the panel body shows for a tab.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelView {
    /// Never requested, in flight, or waiting on the initial load
    Loading,

    Loaded {
        rows: Vec<FieldRow>,
        /// Top-level payload fields not covered by `rows`
        other_fields: Vec<FieldRow>,
        fetched_at: DateTime<Local>,
        /// A refresh is in flight; `rows` show the previous payload
        refreshing: bool,
        /// The last refresh failed; `rows` show the previous payload
        refresh_error: Option<String>,
    },

    Failed {
        reason: String,
        attempts: u32,
        retry_hint: String,
    },
}

/// Page-level view: the error banner replaces any panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    Loading,
    Error { message: String, retry_hint: String },
    Panel(PanelView),
}

/// Project the whole page.
pub fn page_view(state: &AppState) -> PageView {
    match &state.page {
        PageStatus::Error { message } => PageView::Error {
            message: message.clone(),
            retry_hint: "Press r to retry".to_string(),
        },
        PageStatus::Ready => PageView::Panel(panel_view(state, state.active_tab)),
        PageStatus::NotStarted | PageStatus::CheckingHealth { .. } | PageStatus::FetchingOverview { .. } => {
            PageView::Loading
        }
    }
}

/// Project one tab.
pub fn panel_view(state: &AppState, tab: TabId) -> PanelView {
    let load = state.tab_load(tab);

    if let Some(cached) = state.cache.get(tab) {
        let refresh_error = match load {
            TabLoad::Failed { reason, .. } => Some(reason.clone()),
            _ => None,
        };
        return PanelView::Loaded {
            rows: field_rows(tab, &cached.payload, state.settings.ui.show_sample_values),
            other_fields: other_fields(tab, &cached.payload),
            fetched_at: cached.fetched_at,
            refreshing: load.is_loading(),
            refresh_error,
        };
    }

    match load {
        TabLoad::NotRequested | TabLoad::Loading { .. } | TabLoad::Loaded => PanelView::Loading,
        TabLoad::Failed { reason, attempts } => {
            let behavior = &state.settings.behavior;
            let retry_hint = if behavior.can_retry(*attempts) {
                "Press r to retry".to_string()
            } else {
                "Retry limit reached; select the tab again to start over".to_string()
            };
            PanelView::Failed {
                reason: reason.clone(),
                attempts: *attempts,
                retry_hint,
            }
        }
    }
}

/// Headline rows for `tab`, filling gaps with samples when enabled.
pub fn field_rows(tab: TabId, payload: &TabPayload, show_samples: bool) -> Vec<FieldRow> {
    field_specs(tab)
        .iter()
        .map(|spec| match payload.get(spec.path) {
            Some(value) if !value.is_null() => FieldRow {
                label: spec.label.to_string(),
                value: display_value(value),
                synthesized: false,
            },
            _ => FieldRow {
                label: spec.label.to_string(),
                value: if show_samples {
                    spec.fallback.to_string()
                } else {
                    MISSING_VALUE.to_string()
                },
                synthesized: true,
            },
        })
        .collect()
}

/// Scalar top-level fields the headline rows don't already show.
fn other_fields(tab: TabId, payload: &TabPayload) -> Vec<FieldRow> {
    let specs = field_specs(tab);
    payload
        .fields()
        .iter()
        .filter(|(key, _)| {
            !specs
                .iter()
                .any(|spec| spec.path.split('.').next() == Some(key.as_str()))
        })
        .map(|(key, value)| FieldRow {
            label: key.replace('_', " "),
            value: display_value(value),
            synthesized: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::state::{CachedPayload, RequestGeneration};
    use ideck_core::Envelope;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> TabPayload {
        let mut value = value;
        value["status"] = json!("success");
        Envelope::from_value(value).unwrap().into_payload().unwrap()
    }

    fn ready_with(tab: TabId, payload: TabPayload) -> AppState {
        let mut state = AppState::new(Settings::default());
        state.page = PageStatus::Ready;
        state.active_tab = tab;
        state.cache.insert(
            tab,
            CachedPayload {
                payload,
                fetched_at: Local::now(),
                generation: RequestGeneration(1),
            },
        );
        state.set_tab_load(tab, TabLoad::Loaded);
        state
    }

    #[test]
    fn test_every_tab_has_fields() {
        for tab in TabId::ALL {
            assert!(!field_specs(tab).is_empty(), "{tab} has no fields");
        }
    }

    #[test]
    fn test_unrequested_tab_is_loading() {
        let mut state = AppState::new(Settings::default());
        state.page = PageStatus::Ready;
        assert_eq!(panel_view(&state, TabId::Memories), PanelView::Loading);
    }

    #[test]
    fn test_concepts_total_is_shown() {
        let state = ready_with(TabId::Concepts, payload(json!({"total_concepts": 18})));

        let PanelView::Loaded { rows, .. } = panel_view(&state, TabId::Concepts) else {
            panic!("expected loaded panel");
        };
        let total = rows.iter().find(|r| r.label == "Total concepts").unwrap();
        assert_eq!(total.value, "18");
        assert!(!total.synthesized);
    }

    #[test]
    fn test_missing_fields_are_synthesized() {
        let state = ready_with(TabId::Concepts, payload(json!({"total_concepts": 18})));

        let PanelView::Loaded { rows, .. } = panel_view(&state, TabId::Concepts) else {
            panic!("expected loaded panel");
        };
        let clusters = rows.iter().find(|r| r.label == "Concept clusters").unwrap();
        assert_eq!(clusters.value, "0");
        assert!(clusters.synthesized);
    }

    #[test]
    fn test_samples_disabled_show_placeholder() {
        let rows = field_rows(TabId::Agents, &TabPayload::default(), false);
        assert!(rows
            .iter()
            .all(|r| r.synthesized && r.value == MISSING_VALUE));
    }

    #[test]
    fn test_nested_paths_and_null_values() {
        let rows = field_rows(
            TabId::KnowledgeGraph,
            &payload(json!({
                "graph_stats": {"nodes": 120, "density": null},
                "central_concepts": [{"name": "memory"}]
            })),
            true,
        );
        let value = |label: &str| rows.iter().find(|r| r.label == label).unwrap().clone();

        assert_eq!(value("Nodes").value, "120");
        assert!(value("Density").synthesized);
        assert_eq!(value("Central concept").value, "memory");
    }

    #[test]
    fn test_other_fields_exclude_headline_roots() {
        let state = ready_with(
            TabId::KnowledgeGraph,
            payload(json!({"graph_stats": {"nodes": 1}, "last_sync": "today"})),
        );

        let PanelView::Loaded { other_fields, .. } = panel_view(&state, TabId::KnowledgeGraph)
        else {
            panic!("expected loaded panel");
        };
        assert_eq!(other_fields.len(), 1);
        assert_eq!(other_fields[0].label, "last sync");
        assert_eq!(other_fields[0].value, "today");
    }

    #[test]
    fn test_failed_tab_offers_retry() {
        let mut state = AppState::new(Settings::default());
        state.page = PageStatus::Ready;
        state.set_tab_load(
            TabId::Agents,
            TabLoad::Failed {
                reason: "HTTP 502".into(),
                attempts: 1,
            },
        );

        match panel_view(&state, TabId::Agents) {
            PanelView::Failed {
                reason, retry_hint, ..
            } => {
                assert_eq!(reason, "HTTP 502");
                assert!(retry_hint.contains("Press r"));
            }
            other => panic!("expected failed panel, got {other:?}"),
        }

        state.set_tab_load(
            TabId::Agents,
            TabLoad::Failed {
                reason: "HTTP 502".into(),
                attempts: 3,
            },
        );
        match panel_view(&state, TabId::Agents) {
            PanelView::Failed { retry_hint, .. } => {
                assert!(retry_hint.contains("limit"));
            }
            other => panic!("expected failed panel, got {other:?}"),
        }
    }

    #[test]
    fn test_refreshing_keeps_rows() {
        let mut state = ready_with(TabId::Memories, payload(json!({"total_memories": 5})));
        state.set_tab_load(
            TabId::Memories,
            TabLoad::Loading {
                generation: RequestGeneration(2),
                attempt: 1,
            },
        );

        let PanelView::Loaded {
            rows, refreshing, ..
        } = panel_view(&state, TabId::Memories)
        else {
            panic!("expected loaded panel");
        };
        assert!(refreshing);
        assert_eq!(rows[0].value, "5");
    }

    #[test]
    fn test_page_error_replaces_panel() {
        let mut state = AppState::new(Settings::default());
        state.page = PageStatus::Error {
            message: "Backend unavailable: HTTP 500".into(),
        };

        match page_view(&state) {
            PageView::Error {
                message,
                retry_hint,
            } => {
                assert!(message.contains("HTTP 500"));
                assert!(retry_hint.contains("retry"));
            }
            other => panic!("expected error page, got {other:?}"),
        }
    }

    #[test]
    fn test_page_loading_before_ready() {
        let mut state = AppState::new(Settings::default());
        assert_eq!(page_view(&state), PageView::Loading);
        state.page = PageStatus::CheckingHealth {
            generation: RequestGeneration(1),
        };
        assert_eq!(page_view(&state), PageView::Loading);
    }
}
