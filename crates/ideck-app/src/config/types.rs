//! Configuration types

use std::collections::BTreeMap;
use std::time::Duration;

use ideck_client::{ClientOptions, EndpointTable, DEFAULT_BASE_URL};
use ideck_core::prelude::*;
use ideck_core::TabId;
use serde::{Deserialize, Serialize};

/// Application settings (config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub endpoints: EndpointSettings,

    #[serde(default)]
    pub behavior: BehaviorSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

impl Settings {
    /// Resolve the endpoint table from `server.base_url` and path overrides.
    ///
    /// Unknown tab ids under `[endpoints]` are reported as errors so a typo
    /// doesn't silently fall back to the default path.
    pub fn endpoint_table(&self) -> Result<EndpointTable> {
        let mut table = EndpointTable::new(&self.server.base_url)?;

        if let Some(health) = &self.endpoints.health {
            table = table.with_health_path(health)?;
        }
        for (id, path) in &self.endpoints.tabs {
            let tab: TabId = id.parse()?;
            table = table.with_tab_path(tab, path)?;
        }

        Ok(table)
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            timeout: Duration::from_millis(self.server.timeout_ms),
            connect_timeout: Duration::from_millis(self.server.connect_timeout_ms),
        }
    }
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerSettings {
    /// Base URL every endpoint path is joined to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// TCP connect timeout in milliseconds
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_connect_timeout_ms() -> u64 {
    3_000
}

/// Endpoint path overrides, relative to `server.base_url`.
///
/// ```toml
/// [endpoints]
/// health = "api/insights/test"
/// concepts = "v2/concepts"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EndpointSettings {
    /// Health check path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<String>,

    /// Per-tab paths keyed by tab id
    #[serde(flatten)]
    pub tabs: BTreeMap<String, String>,
}

/// Behavior settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BehaviorSettings {
    /// Tab shown on startup
    #[serde(default)]
    pub default_tab: TabId,

    /// Consecutive fetch attempts per tab before explicit retry is refused
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,

    /// Delay before the first explicit retry; doubles per attempt
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Upper bound for the retry delay
    #[serde(default = "default_retry_backoff_max_ms")]
    pub retry_backoff_max_ms: u64,
}

impl BehaviorSettings {
    /// Delay before retrying a tab whose last `attempts` fetches failed.
    pub fn retry_delay(&self, attempts: u32) -> Duration {
        let exponent = attempts.saturating_sub(1).min(16);
        let delay = self
            .retry_backoff_ms
            .saturating_mul(1u64 << exponent)
            .min(self.retry_backoff_max_ms);
        Duration::from_millis(delay)
    }

    /// Whether another explicit retry is allowed after `attempts` failures.
    pub fn can_retry(&self, attempts: u32) -> bool {
        attempts < self.retry_max_attempts
    }
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            default_tab: TabId::Overview,
            retry_max_attempts: default_retry_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            retry_backoff_max_ms: default_retry_backoff_max_ms(),
        }
    }
}

fn default_retry_max_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_retry_backoff_max_ms() -> u64 {
    8_000
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UiSettings {
    /// Show sample values for fields the backend didn't send
    #[serde(default = "default_true")]
    pub show_sample_values: bool,

    /// Terminal poll timeout (and tick interval) in milliseconds
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            show_sample_values: true,
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_tick_rate_ms() -> u64 {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.base_url, "http://127.0.0.1:8000");
        assert_eq!(settings.server.timeout_ms, 10_000);
        assert_eq!(settings.behavior.default_tab, TabId::Overview);
        assert_eq!(settings.behavior.retry_max_attempts, 3);
        assert!(settings.ui.show_sample_values);
        assert!(settings.endpoints.tabs.is_empty());
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_toml() {
        let settings: Settings = toml::from_str(
            r#"
[server]
base_url = "https://insights.example.com"

[behavior]
default_tab = "agents"
retry_max_attempts = 5

[endpoints]
health = "healthz"
concepts = "v2/concepts"
"#,
        )
        .unwrap();

        assert_eq!(settings.server.base_url, "https://insights.example.com");
        assert_eq!(settings.server.timeout_ms, 10_000);
        assert_eq!(settings.behavior.default_tab, TabId::Agents);
        assert_eq!(settings.behavior.retry_max_attempts, 5);
        assert_eq!(settings.endpoints.health.as_deref(), Some("healthz"));
        assert_eq!(
            settings.endpoints.tabs.get("concepts").map(String::as_str),
            Some("v2/concepts")
        );
    }

    #[test]
    fn test_endpoint_table_applies_overrides() {
        let mut settings = Settings::default();
        settings.server.base_url = "http://host:9000".to_string();
        settings.endpoints.health = Some("healthz".to_string());
        settings
            .endpoints
            .tabs
            .insert("concepts".to_string(), "v2/concepts".to_string());

        let table = settings.endpoint_table().unwrap();
        assert_eq!(table.health_url().as_str(), "http://host:9000/healthz");
        assert_eq!(
            table.tab_url(TabId::Concepts).as_str(),
            "http://host:9000/v2/concepts"
        );
        assert_eq!(
            table.tab_url(TabId::Memories).as_str(),
            "http://host:9000/api/insights/memories"
        );
    }

    #[test]
    fn test_endpoint_table_rejects_unknown_tab_override() {
        let mut settings = Settings::default();
        settings
            .endpoints
            .tabs
            .insert("settings".to_string(), "x".to_string());

        assert!(matches!(
            settings.endpoint_table(),
            Err(Error::UnknownTab { .. })
        ));
    }

    #[test]
    fn test_retry_delay_doubles_and_caps() {
        let behavior = BehaviorSettings::default();
        assert_eq!(behavior.retry_delay(1), Duration::from_millis(500));
        assert_eq!(behavior.retry_delay(2), Duration::from_millis(1_000));
        assert_eq!(behavior.retry_delay(3), Duration::from_millis(2_000));
        assert_eq!(behavior.retry_delay(10), Duration::from_millis(8_000));
        assert_eq!(behavior.retry_delay(0), Duration::from_millis(500));
    }

    #[test]
    fn test_can_retry_respects_max_attempts() {
        let behavior = BehaviorSettings::default();
        assert!(behavior.can_retry(1));
        assert!(behavior.can_retry(2));
        assert!(!behavior.can_retry(3));
    }

    #[test]
    fn test_client_options_from_settings() {
        let mut settings = Settings::default();
        settings.server.timeout_ms = 2_500;
        settings.server.connect_timeout_ms = 400;

        let options = settings.client_options();
        assert_eq!(options.timeout, Duration::from_millis(2_500));
        assert_eq!(options.connect_timeout, Duration::from_millis(400));
    }
}
