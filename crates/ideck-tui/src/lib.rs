//! ideck-tui - Terminal UI for Insights Deck
//!
//! Drives an [`Engine`](ideck_app::Engine) from crossterm key events and
//! renders its state with ratatui.

pub mod event;
pub mod layout;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

pub use runner::run;
