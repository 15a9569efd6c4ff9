//! Main update function - handles state transitions (TEA pattern)

use crate::message::Message;
use crate::state::AppState;

use super::{keys::handle_key, overview, tabs, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Key(key) => match handle_key(state, key) {
            Some(msg) => UpdateResult::message(msg),
            None => UpdateResult::none(),
        },

        Message::Tick => {
            state.tick = state.tick.wrapping_add(1);
            UpdateResult::none()
        }

        Message::Quit => {
            state.request_quit();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Initial Load
        // ─────────────────────────────────────────────────────────
        Message::Start => overview::handle_start(state),
        Message::RetryInitialLoad => overview::handle_retry(state),
        Message::HealthCheckSucceeded { generation } => {
            overview::handle_health_check_succeeded(state, generation)
        }
        Message::HealthCheckFailed { generation, error } => {
            overview::handle_health_check_failed(state, generation, error)
        }

        // ─────────────────────────────────────────────────────────
        // Tabs
        // ─────────────────────────────────────────────────────────
        Message::SelectTab(tab) => tabs::handle_select(state, tab),
        Message::NextTab => UpdateResult::message(Message::SelectTab(state.active_tab.next())),
        Message::PrevTab => UpdateResult::message(Message::SelectTab(state.active_tab.prev())),
        Message::RetryTab(tab) => tabs::handle_retry(state, tab),
        Message::RefreshTab(tab) => tabs::handle_refresh(state, tab),
        Message::TabFetched {
            tab,
            generation,
            payload,
        } => tabs::handle_fetched(state, tab, generation, payload),
        Message::TabFetchFailed {
            tab,
            generation,
            error,
        } => tabs::handle_fetch_failed(state, tab, generation, error),
    }
}
