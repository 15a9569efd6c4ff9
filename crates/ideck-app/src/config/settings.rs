//! Settings loader for config.toml
//!
//! Layers, lowest priority first:
//! 1. `<config_dir>/insights-deck/config.toml`
//! 2. `.ideck/config.toml` in the working directory
//!
//! CLI flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use ideck_core::prelude::*;

use super::types::Settings;

const CONFIG_FILENAME: &str = "config.toml";
const APP_DIR: &str = "insights-deck";
const PROJECT_DIR: &str = ".ideck";

const DEFAULT_CONFIG: &str = r#"# Insights Deck configuration

[server]
base_url = "http://127.0.0.1:8000"
timeout_ms = 10000          # Whole-request timeout
connect_timeout_ms = 3000   # TCP connect timeout

[endpoints]
# Paths are relative to server.base_url
# health = "api/insights/test"
# concepts = "api/insights/concepts"

[behavior]
default_tab = "overview"
retry_max_attempts = 3      # Attempts per tab before `r` gives up
retry_backoff_ms = 500      # Doubles per attempt
retry_backoff_max_ms = 8000

[ui]
show_sample_values = true   # Fill fields the backend didn't send with samples
tick_rate_ms = 50
"#;

/// Path of the user-level config file, if a config directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILENAME))
}

/// Path of the project-local config file under `project_path`.
pub fn project_config_path(project_path: &Path) -> PathBuf {
    project_path.join(PROJECT_DIR).join(CONFIG_FILENAME)
}

/// Load layered settings. Never fails: unreadable layers are skipped with
/// a warning and missing ones silently.
pub fn load_settings(project_path: &Path) -> Settings {
    let layers: Vec<PathBuf> = user_config_path()
        .into_iter()
        .chain(std::iter::once(project_config_path(project_path)))
        .collect();

    load_layers(&layers)
}

/// Merge the given files in order, later files overriding earlier ones.
pub fn load_layers(paths: &[PathBuf]) -> Settings {
    let mut merged = toml::Table::new();

    for path in paths {
        if !path.exists() {
            debug!("No config file at {:?}", path);
            continue;
        }
        match read_table(path) {
            Ok(table) => {
                debug!("Loaded settings layer from {:?}", path);
                merge_tables(&mut merged, table);
            }
            Err(e) => warn!("Ignoring config {:?}: {}", path, e),
        }
    }

    match toml::Value::Table(merged).try_into::<Settings>() {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Invalid settings, using defaults: {}", e);
            Settings::default()
        }
    }
}

/// Load a single explicitly named file (`--config`). Unlike the layered
/// loader this is strict: the file must exist and parse.
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Err(Error::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&content).map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
}

/// Write the commented default config to `path` unless it already exists.
///
/// Returns `true` when a file was written.
pub fn save_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        debug!("Config already exists at {:?}", path);
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::config(format!("Failed to create {}: {}", parent.display(), e)))?;
    }
    std::fs::write(path, DEFAULT_CONFIG)
        .map_err(|e| Error::config(format!("Failed to write {}: {}", path.display(), e)))?;

    info!("Wrote default config to {:?}", path);
    Ok(true)
}

fn read_table(path: &Path) -> Result<toml::Table> {
    let content = std::fs::read_to_string(path)?;
    content
        .parse::<toml::Table>()
        .map_err(|e| Error::config(e.to_string()))
}

/// Deep-merge `overlay` into `base`; nested tables merge key by key.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
