//! Initial page load: check backend health, then fetch the overview.
//!
//! A failed health check or overview fetch puts the page into
//! [`PageStatus::Error`]; only [`Message::RetryInitialLoad`] restarts it.
//!
//! [`Message::RetryInitialLoad`]: crate::message::Message::RetryInitialLoad

use ideck_core::prelude::*;
use ideck_core::TabId;

use crate::state::{AppState, PageStatus, RequestGeneration};

use super::tabs::{dispatch_fetch, load_tab_data};
use super::{UpdateAction, UpdateResult};

pub fn handle_start(state: &mut AppState) -> UpdateResult {
    if state.page != PageStatus::NotStarted {
        debug!("Ignoring start: page is {}", state.page.label());
        return UpdateResult::none();
    }
    begin(state)
}

pub fn handle_retry(state: &mut AppState) -> UpdateResult {
    if !state.page.is_error() {
        debug!("Ignoring initial-load retry: page is {}", state.page.label());
        return UpdateResult::none();
    }
    info!("Retrying initial load");
    begin(state)
}

fn begin(state: &mut AppState) -> UpdateResult {
    let generation = state.next_generation();
    state.page = PageStatus::CheckingHealth { generation };
    debug!("CheckingHealth backend health ({})", generation);

    UpdateResult::action(UpdateAction::CheckHealth { generation })
}

pub fn handle_health_check_succeeded(state: &mut AppState, generation: RequestGeneration) -> UpdateResult {
    if state.page != (PageStatus::CheckingHealth { generation }) {
        debug!("Dropping stale health check ({})", generation);
        return UpdateResult::none();
    }

    info!("Backend is healthy");

    if state.cache.contains(TabId::Overview) {
        state.page = PageStatus::Ready;
        let active = state.active_tab;
        return UpdateResult::maybe_action(load_tab_data(state, active));
    }

    let action = dispatch_fetch(state, TabId::Overview, 1, None);
    if let UpdateAction::FetchTab { generation, .. } = action {
        state.page = PageStatus::FetchingOverview { generation };
    }
    UpdateResult::action(action)
}

pub fn handle_health_check_failed(
    state: &mut AppState,
    generation: RequestGeneration,
    error: String,
) -> UpdateResult {
    if state.page != (PageStatus::CheckingHealth { generation }) {
        debug!("Dropping stale health check failure ({})", generation);
        return UpdateResult::none();
    }

    warn!("Health check failed: {}", error);
    state.page = PageStatus::Error {
        message: format!("Backend unavailable: {error}"),
    };

    UpdateResult::none()
}
