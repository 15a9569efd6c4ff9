//! Centralized theme for the TUI.
//!
//! - `palette`: raw color constants
//! - `styles`: semantic style builders
//! - `icons`: status glyphs and spinner frames

pub mod icons;
pub mod palette;
pub mod styles;
