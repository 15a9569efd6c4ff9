//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `overview`: Two-step initial load (health check, then overview)
//! - `tabs`: Tab selection, lazy loading, retry and refresh
//! - `keys`: Key bindings

pub(crate) mod keys;
pub(crate) mod overview;
pub(crate) mod tabs;
pub(crate) mod update;


use std::time::Duration;

use ideck_core::TabId;

use crate::message::Message;
use crate::state::RequestGeneration;

pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Check the backend health endpoint
    CheckHealth { generation: RequestGeneration },

    /// Fetch one tab's payload, optionally after a backoff delay
    FetchTab {
        tab: TabId,
        generation: RequestGeneration,
        delay: Option<Duration>,
    },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }

    /// Wrap an optional action.
    pub fn maybe_action(action: Option<UpdateAction>) -> Self {
        Self {
            message: None,
            action,
        }
    }
}
