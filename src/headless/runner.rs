//! Headless mode runner - main event loop without TUI

use std::io::Write;

use ideck_app::{Engine, EngineEvent, Message, TabLoad};
use ideck_client::InsightsSource;
use ideck_core::prelude::*;
use ideck_core::TabId;
use tokio::sync::broadcast::{self, error::TryRecvError};

use super::HeadlessEvent;

/// Outcome of a headless run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlessSummary {
    /// The initial load completed
    pub page_ready: bool,
    /// Tabs with a cached payload
    pub loaded: usize,
    /// Tabs whose last attempt failed and that have nothing cached
    pub failed: usize,
}

impl HeadlessSummary {
    pub fn success(&self) -> bool {
        self.page_ready && self.failed == 0
    }
}

/// Load every tab once and report progress as NDJSON on `out`.
pub async fn run_headless<S, W>(engine: &mut Engine<S>, out: &mut W) -> Result<HeadlessSummary>
where
    S: InsightsSource + Sync + 'static,
    W: Write,
{
    info!("═══════════════════════════════════════════════════════");
    info!("Insights Deck starting in HEADLESS mode");
    info!("Backend: {}", engine.state.settings.server.base_url);
    info!("═══════════════════════════════════════════════════════");

    let mut events = engine.subscribe();
    engine.spawn_signal_handler();
    engine.start();

    let result = headless_event_loop(engine, &mut events, out).await;

    engine.shutdown();

    let summary = summarize(engine);
    HeadlessEvent::finished(&summary).emit(out);
    info!(
        "Headless run finished: {} loaded, {} failed",
        summary.loaded, summary.failed
    );

    result.map(|_| summary)
}

async fn headless_event_loop<S, W>(
    engine: &mut Engine<S>,
    events: &mut broadcast::Receiver<EngineEvent>,
    out: &mut W,
) -> Result<()>
where
    S: InsightsSource + Sync + 'static,
    W: Write,
{
    loop {
        if forward_events(engine, events, out) {
            break;
        }

        if engine.state.page.is_ready() && engine.state.all_tabs_settled() {
            info!("Every tab settled");
            break;
        }

        if engine.should_quit() {
            info!("Quit requested");
            break;
        }

        match engine.recv_message().await {
            Some(msg) => engine.process_message(msg),
            None => {
                info!("Message channel closed");
                return Err(Error::ChannelClosed);
            }
        }
    }

    Ok(())
}

/// Translate pending engine events into NDJSON and react to them.
///
/// Returns `true` once the run should stop.
fn forward_events<S, W>(
    engine: &mut Engine<S>,
    events: &mut broadcast::Receiver<EngineEvent>,
    out: &mut W,
) -> bool
where
    S: InsightsSource + Sync + 'static,
    W: Write,
{
    let mut finished = false;

    loop {
        let event = match events.try_recv() {
            Ok(event) => event,
            Err(TryRecvError::Lagged(skipped)) => {
                warn!("Headless runner skipped {} engine events", skipped);
                continue;
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        };
        trace!("Engine event: {}", event.event_type());

        match event {
            EngineEvent::PageReady => {
                HeadlessEvent::page_ready(&engine.state.settings.server.base_url).emit(out);
                for &tab in TabId::ALL.iter().filter(|&&tab| tab != TabId::Overview) {
                    engine.process_message(Message::SelectTab(tab));
                }
            }

            EngineEvent::PageFailed { message } => {
                HeadlessEvent::page_error(message).emit(out);
                finished = true;
            }

            EngineEvent::TabLoaded { tab, field_count } => {
                HeadlessEvent::tab_loaded(tab, field_count).emit(out);
            }

            EngineEvent::TabFailed {
                tab,
                reason,
                attempts,
            } => {
                let will_retry = engine.state.page.is_ready()
                    && engine.state.settings.behavior.can_retry(attempts);
                HeadlessEvent::tab_failed(tab, reason, attempts, will_retry).emit(out);
                if will_retry {
                    engine.process_message(Message::RetryTab(tab));
                }
            }

            EngineEvent::Shutdown => {}
        }
    }

    finished
}

fn summarize<S>(engine: &Engine<S>) -> HeadlessSummary
where
    S: InsightsSource + Sync + 'static,
{
    let state = &engine.state;
    let loaded = TabId::ALL
        .iter()
        .filter(|&&tab| state.cache.contains(tab))
        .count();
    let failed = TabId::ALL
        .iter()
        .filter(|&&tab| {
            !state.cache.contains(tab) && matches!(state.tab_load(tab), TabLoad::Failed { .. })
        })
        .count();

    HeadlessSummary {
        page_ready: state.page.is_ready(),
        loaded,
        failed,
    }
}
