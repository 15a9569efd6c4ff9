//! Engine - shared orchestration for the TUI and headless runners
//!
//! Owns the TEA state, the message channel every background task reports
//! into, the data source, and the event broadcaster.

use std::sync::Arc;

use ideck_client::InsightsSource;
use ideck_core::TabId;
use tokio::sync::{broadcast, mpsc};

use crate::config::Settings;
use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::process;
use crate::signals;
use crate::state::{AppState, PageStatus, TabLoad};

/// Capacity of the message channel and of the event broadcaster.
const CHANNEL_CAPACITY: usize = 256;

/// Lightweight snapshot of state for change detection.
///
/// Captured before message processing, compared after to decide which
/// [`EngineEvent`]s to emit.
#[derive(Debug, Clone)]
struct StateSnapshot {
    page: PageStatus,
    loads: Vec<(TabId, TabLoad)>,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        Self {
            page: state.page.clone(),
            loads: TabId::ALL
                .iter()
                .map(|&tab| (tab, state.tab_load(tab).clone()))
                .collect(),
        }
    }
}

/// Orchestration engine for Insights Deck.
pub struct Engine<S> {
    /// TEA application state (the Model)
    pub state: AppState,

    /// Sender half of the message channel. Clone it for input sources.
    pub msg_tx: mpsc::Sender<Message>,

    /// Receiver half of the message channel, drained by the runner.
    msg_rx: mpsc::Receiver<Message>,

    /// Where tab data comes from
    source: Arc<S>,

    event_tx: broadcast::Sender<EngineEvent>,
}

impl<S> Engine<S>
where
    S: InsightsSource + Sync + 'static,
{
    pub fn new(settings: Settings, source: S) -> Self {
        let state = AppState::new(settings);
        let (msg_tx, msg_rx) = mpsc::channel::<Message>(CHANNEL_CAPACITY);
        let (event_tx, _) = broadcast::channel(CHANNEL_CAPACITY);

        Self {
            state,
            msg_tx,
            msg_rx,
            source: Arc::new(source),
            event_tx,
        }
    }

    /// Subscribe to engine events.
    ///
    /// A subscriber that falls more than the channel capacity behind loses
    /// the oldest events (`RecvError::Lagged`).
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Start the initial load.
    pub fn start(&mut self) {
        self.process_message(Message::Start);
    }

    /// Forward OS termination signals as [`Message::Quit`].
    pub fn spawn_signal_handler(&self) {
        signals::spawn_signal_handler(self.msg_tx.clone());
    }

    /// Process a single message through the TEA update cycle.
    pub fn process_message(&mut self, msg: Message) {
        let pre = StateSnapshot::capture(&self.state);

        process::process_message(&mut self.state, msg, &self.msg_tx, &self.source);

        let post = StateSnapshot::capture(&self.state);
        self.emit_events(&pre, &post);
    }

    /// Process every message already waiting in the channel.
    ///
    /// Returns the number of messages processed.
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Wait for the next message from a background task or input source.
    pub async fn recv_message(&mut self) -> Option<Message> {
        self.msg_rx.recv().await
    }

    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Notify subscribers that the engine is going away.
    pub fn shutdown(&mut self) {
        self.emit(EngineEvent::Shutdown);
    }

    fn emit_events(&self, pre: &StateSnapshot, post: &StateSnapshot) {
        if pre.page != post.page {
            match &post.page {
                PageStatus::Ready => self.emit(EngineEvent::PageReady),
                PageStatus::Error { message } => self.emit(EngineEvent::PageFailed {
                    message: message.clone(),
                }),
                _ => {}
            }
        }

        for ((tab, before), (_, after)) in pre.loads.iter().zip(&post.loads) {
            if before == after {
                continue;
            }
            match after {
                TabLoad::Loaded => {
                    let field_count = self
                        .state
                        .cache
                        .get(*tab)
                        .map(|cached| cached.payload.len())
                        .unwrap_or(0);
                    self.emit(EngineEvent::TabLoaded {
                        tab: *tab,
                        field_count,
                    });
                }
                TabLoad::Failed { reason, attempts } => self.emit(EngineEvent::TabFailed {
                    tab: *tab,
                    reason: reason.clone(),
                    attempts: *attempts,
                }),
                TabLoad::NotRequested | TabLoad::Loading { .. } => {}
            }
        }
    }

    /// send() only fails without subscribers, which is fine.
    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ideck_client::test_utils::{FakeReply, FakeSource};
    use serde_json::json;
    use std::time::Duration;

    /// Process messages from background tasks until `done` holds.
    async fn pump_until(
        engine: &mut Engine<FakeSource>,
        done: impl Fn(&Engine<FakeSource>) -> bool,
    ) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while !done(engine) {
                let msg = engine.recv_message().await.expect("channel open");
                engine.process_message(msg);
            }
        })
        .await
        .expect("engine did not settle in time");
    }

    fn ready_engine(source: FakeSource) -> Engine<FakeSource> {
        Engine::new(Settings::default(), source)
    }

    #[tokio::test]
    async fn test_initial_load_reaches_ready() {
        let source = FakeSource::new();
        let mut engine = ready_engine(source.clone());
        let mut rx = engine.subscribe();

        engine.start();
        pump_until(&mut engine, |e| e.state.page.is_ready()).await;

        assert_eq!(source.health_calls(), 1);
        assert_eq!(source.tab_calls(TabId::Overview), 1);
        assert!(engine.state.cache.contains(TabId::Overview));

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert!(events.contains(&EngineEvent::PageReady));
        assert!(events
            .iter()
            .any(|e| matches!(e, EngineEvent::TabLoaded { tab: TabId::Overview, .. })));
    }

    #[tokio::test]
    async fn test_health_check_500_shows_error_without_overview_request() {
        let source = FakeSource::new();
        source.set_health(FakeReply::HttpStatus(500));
        let mut engine = ready_engine(source.clone());
        let mut rx = engine.subscribe();

        engine.start();
        pump_until(&mut engine, |e| e.state.page.is_error()).await;

        assert_eq!(source.tab_calls(TabId::Overview), 0);
        assert!(engine.state.cache.is_empty());
        assert!(matches!(
            rx.try_recv(),
            Ok(EngineEvent::PageFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_retry_after_health_check_failure_recovers() {
        let source = FakeSource::new();
        source.set_health(FakeReply::Transport("cannot connect".into()));
        let mut engine = ready_engine(source.clone());

        engine.start();
        pump_until(&mut engine, |e| e.state.page.is_error()).await;

        source.set_health(FakeReply::Success(json!({})));
        engine.process_message(Message::RetryInitialLoad);
        pump_until(&mut engine, |e| e.state.page.is_ready()).await;

        assert_eq!(source.health_calls(), 2);
        assert_eq!(source.tab_calls(TabId::Overview), 1);
    }

    #[tokio::test]
    async fn test_concepts_loaded_once() {
        let source = FakeSource::new();
        source.set_tab(
            TabId::Concepts,
            FakeReply::Success(json!({"total_concepts": 18})),
        );
        let mut engine = ready_engine(source.clone());
        engine.start();
        pump_until(&mut engine, |e| e.state.page.is_ready()).await;

        engine.process_message(Message::SelectTab(TabId::Concepts));
        pump_until(&mut engine, |e| e.state.cache.contains(TabId::Concepts)).await;

        engine.process_message(Message::SelectTab(TabId::Overview));
        engine.process_message(Message::SelectTab(TabId::Concepts));
        tokio::task::yield_now().await;
        engine.drain_pending_messages();

        assert_eq!(source.tab_calls(TabId::Concepts), 1);
        let cached = engine.state.cache.get(TabId::Concepts).unwrap();
        assert_eq!(cached.payload.get("total_concepts"), Some(&json!(18)));
    }

    #[tokio::test]
    async fn test_error_envelope_leaves_tab_uncached() {
        let source = FakeSource::new();
        source.set_tab(TabId::Memories, FakeReply::Status("error".into()));
        let mut engine = ready_engine(source.clone());
        let mut rx = engine.subscribe();
        engine.start();
        pump_until(&mut engine, |e| e.state.page.is_ready()).await;

        engine.process_message(Message::SelectTab(TabId::Memories));
        pump_until(&mut engine, |e| {
            matches!(e.state.tab_load(TabId::Memories), TabLoad::Failed { .. })
        })
        .await;

        assert!(!engine.state.cache.contains(TabId::Memories));
        let failed = std::iter::from_fn(|| rx.try_recv().ok())
            .any(|e| matches!(e, EngineEvent::TabFailed { tab: TabId::Memories, .. }));
        assert!(failed);
    }

    #[tokio::test]
    async fn test_shutdown_event() {
        let mut engine = ready_engine(FakeSource::new());
        let mut rx = engine.subscribe();

        engine.shutdown();

        assert_eq!(rx.try_recv().ok(), Some(EngineEvent::Shutdown));
    }

    #[tokio::test]
    async fn test_no_subscribers_no_error() {
        let mut engine = ready_engine(FakeSource::new());
        engine.process_message(Message::Quit);
        assert!(engine.should_quit());
    }

    #[test]
    fn test_state_snapshot_capture() {
        let state = AppState::new(Settings::default());
        let snapshot = StateSnapshot::capture(&state);

        assert_eq!(snapshot.page, PageStatus::NotStarted);
        assert_eq!(snapshot.loads.len(), TabId::ALL.len());
    }
}
