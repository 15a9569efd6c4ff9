//! Action handlers: UpdateAction dispatch and background task spawning
//!
//! Every action becomes a fire-and-forget tokio task that reports back to
//! the loop with a message carrying the request generation. Tasks are never
//! cancelled; stale results are filtered out by the handlers.

use std::sync::Arc;
use std::time::Duration;

use ideck_client::InsightsSource;
use ideck_core::prelude::*;
use ideck_core::TabId;
use tokio::sync::mpsc;

use crate::handler::UpdateAction;
use crate::message::Message;
use crate::state::RequestGeneration;

/// Execute an action by spawning a background task
pub fn handle_action<S>(action: UpdateAction, msg_tx: mpsc::Sender<Message>, source: Arc<S>)
where
    S: InsightsSource + Sync + 'static,
{
    match action {
        UpdateAction::CheckHealth { generation } => {
            spawn_health_check(generation, msg_tx, source);
        }
        UpdateAction::FetchTab {
            tab,
            generation,
            delay,
        } => {
            spawn_tab_fetch(tab, generation, delay, msg_tx, source);
        }
    }
}

fn spawn_health_check<S>(
    generation: RequestGeneration,
    msg_tx: mpsc::Sender<Message>,
    source: Arc<S>,
) where
    S: InsightsSource + Sync + 'static,
{
    tokio::spawn(async move {
        let msg = match source.check_health().await {
            Ok(()) => Message::HealthCheckSucceeded { generation },
            Err(e) => Message::HealthCheckFailed {
                generation,
                error: e.to_string(),
            },
        };
        deliver(&msg_tx, msg).await;
    });
}

fn spawn_tab_fetch<S>(
    tab: TabId,
    generation: RequestGeneration,
    delay: Option<Duration>,
    msg_tx: mpsc::Sender<Message>,
    source: Arc<S>,
) where
    S: InsightsSource + Sync + 'static,
{
    tokio::spawn(async move {
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let msg = match source.fetch_tab(tab).await {
            Ok(payload) => Message::TabFetched {
                tab,
                generation,
                payload,
            },
            Err(e) => {
                if !e.is_recoverable() {
                    error!("Unexpected error fetching {}: {:?}", tab, e);
                }
                Message::TabFetchFailed {
                    tab,
                    generation,
                    error: e.to_string(),
                }
            }
        };
        deliver(&msg_tx, msg).await;
    });
}

async fn deliver(msg_tx: &mpsc::Sender<Message>, msg: Message) {
    if msg_tx.send(msg).await.is_err() {
        debug!("Message channel closed; dropping fetch result");
    }
}
