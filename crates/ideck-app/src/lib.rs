//! ideck-app - Application state and orchestration for Insights Deck
//!
//! Implements the TEA (The Elm Architecture) loop that coordinates lazy tab
//! loading: `Message` in, `update()` mutates `AppState`, `UpdateAction` out,
//! background tasks report back with messages. Also owns configuration and
//! the panel view model the TUI renders.

pub mod actions;
pub mod config;
pub mod engine;
pub mod engine_event;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod panel;
pub mod process;
pub mod signals;
pub mod state;

// Re-export primary types
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::Message;
pub use panel::{page_view, panel_view, FieldRow, PageView, PanelView};
pub use state::{AppState, CachedPayload, PageStatus, RequestGeneration, TabCache, TabLoad};
