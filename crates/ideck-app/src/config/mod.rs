//! Configuration for Insights Deck
//!
//! Supports:
//! - `<config_dir>/insights-deck/config.toml` - User settings
//! - `.ideck/config.toml` - Project-local overrides

pub mod settings;
pub mod types;

pub use settings::{
    load_layers, load_settings, load_settings_file, project_config_path, save_default_config,
    user_config_path,
};
pub use types::*;
