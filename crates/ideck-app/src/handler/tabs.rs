//! Tab selection and lazy loading
//!
//! A tab is fetched the first time it becomes active after the page is
//! ready. Once cached it is never fetched again unless refreshed. Every
//! dispatched fetch carries a fresh [`RequestGeneration`]; completions whose
//! generation no longer matches the tab's pending request are dropped.

use std::time::Duration;

use chrono::Local;
use ideck_core::prelude::*;
use ideck_core::{TabId, TabPayload};

use crate::state::{AppState, CachedPayload, PageStatus, RequestGeneration, TabLoad};

use super::{UpdateAction, UpdateResult};

/// Make `tab` active and lazily load it.
pub fn handle_select(state: &mut AppState, tab: TabId) -> UpdateResult {
    if state.active_tab != tab {
        debug!("Selected tab {}", tab);
        state.status_message = None;
    }
    state.active_tab = tab;

    UpdateResult::maybe_action(load_tab_data(state, tab))
}

/// Lazy-load check for `tab`.
///
/// Returns a fetch action only when the tab has no cached payload, no
/// request in flight, and the initial load has finished. Selecting a failed
/// tab starts a fresh attempt series.
pub fn load_tab_data(state: &mut AppState, tab: TabId) -> Option<UpdateAction> {
    if state.cache.contains(tab) {
        trace!("{} already cached", tab);
        return None;
    }

    if let TabLoad::Loading { generation, .. } = state.tab_load(tab) {
        debug!("{} already loading ({})", tab, generation);
        return None;
    }

    if !state.page.is_ready() {
        debug!("Deferring {} until the page is ready", tab);
        return None;
    }

    // The overview belongs to the initial load
    if tab == TabId::Overview {
        return None;
    }

    Some(dispatch_fetch(state, tab, 1, None))
}

/// Explicit retry with backoff.
pub fn handle_retry(state: &mut AppState, tab: TabId) -> UpdateResult {
    if !state.page.is_ready() {
        debug!("Ignoring retry of {}: page not ready", tab);
        return UpdateResult::none();
    }

    match state.tab_load(tab).clone() {
        TabLoad::NotRequested => UpdateResult::maybe_action(load_tab_data(state, tab)),

        TabLoad::Loading { generation, .. } => {
            debug!("Ignoring retry of {}: {} in flight", tab, generation);
            UpdateResult::none()
        }

        TabLoad::Loaded => {
            debug!("Ignoring retry of {}: already loaded", tab);
            UpdateResult::none()
        }

        TabLoad::Failed { attempts, .. } => {
            let behavior = &state.settings.behavior;
            if !behavior.can_retry(attempts) {
                warn!(
                    "Not retrying {}: {} of {} attempts used",
                    tab, attempts, behavior.retry_max_attempts
                );
                state.status_message = Some(format!(
                    "{}: gave up after {} attempts (reselect the tab to start over)",
                    tab.label(),
                    attempts
                ));
                return UpdateResult::none();
            }

            let delay = behavior.retry_delay(attempts);
            info!(
                "Retrying {} in {}ms (attempt {})",
                tab,
                delay.as_millis(),
                attempts + 1
            );
            state.status_message = Some(format!(
                "Retrying {} in {:.1}s",
                tab.label(),
                delay.as_secs_f64()
            ));
            UpdateResult::action(dispatch_fetch(state, tab, attempts + 1, Some(delay)))
        }
    }
}

/// Re-fetch a tab. The cached payload stays visible until the new one
/// arrives.
pub fn handle_refresh(state: &mut AppState, tab: TabId) -> UpdateResult {
    if !state.page.is_ready() {
        debug!("Ignoring refresh of {}: page not ready", tab);
        return UpdateResult::none();
    }

    if !state.cache.contains(tab) {
        return UpdateResult::maybe_action(load_tab_data(state, tab));
    }

    if state.tab_load(tab).is_loading() {
        debug!("Ignoring refresh of {}: already loading", tab);
        return UpdateResult::none();
    }

    info!("Refreshing {}", tab);
    UpdateResult::action(dispatch_fetch(state, tab, 1, None))
}

/// A fetch completed successfully.
pub fn handle_fetched(
    state: &mut AppState,
    tab: TabId,
    generation: RequestGeneration,
    payload: TabPayload,
) -> UpdateResult {
    if !state.accepts(tab, generation) {
        debug!("Dropping stale result for {} ({})", tab, generation);
        return UpdateResult::none();
    }

    info!("Loaded {} ({} fields, {})", tab, payload.len(), generation);
    state.cache.insert(
        tab,
        CachedPayload {
            payload,
            fetched_at: Local::now(),
            generation,
        },
    );
    state.set_tab_load(tab, TabLoad::Loaded);
    if state.active_tab == tab {
        state.status_message = None;
    }

    if state.page == (PageStatus::FetchingOverview { generation }) {
        info!("Initial load complete");
        state.page = PageStatus::Ready;
        let active = state.active_tab;
        return UpdateResult::maybe_action(load_tab_data(state, active));
    }

    UpdateResult::none()
}

/// A fetch failed. The cache is left untouched.
pub fn handle_fetch_failed(
    state: &mut AppState,
    tab: TabId,
    generation: RequestGeneration,
    error: String,
) -> UpdateResult {
    let attempt = match state.tab_load(tab) {
        TabLoad::Loading {
            generation: pending,
            attempt,
        } if *pending == generation => *attempt,
        _ => {
            debug!("Dropping stale failure for {} ({})", tab, generation);
            return UpdateResult::none();
        }
    };

    warn!("Failed to load {} (attempt {}): {}", tab, attempt, error);

    if state.page == (PageStatus::FetchingOverview { generation }) {
        state.page = PageStatus::Error {
            message: format!("Failed to load overview: {error}"),
        };
    }

    state.set_tab_load(
        tab,
        TabLoad::Failed {
            reason: error,
            attempts: attempt,
        },
    );

    UpdateResult::none()
}

/// Mark `tab` loading under a fresh generation and build the fetch action.
pub(crate) fn dispatch_fetch(
    state: &mut AppState,
    tab: TabId,
    attempt: u32,
    delay: Option<Duration>,
) -> UpdateAction {
    let generation = state.next_generation();
    state.set_tab_load(tab, TabLoad::Loading { generation, attempt });
    debug!("Fetching {} ({}, attempt {})", tab, generation, attempt);

    UpdateAction::FetchTab {
        tab,
        generation,
        delay,
    }
}
