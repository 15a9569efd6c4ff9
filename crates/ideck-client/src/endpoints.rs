//! Endpoint table: where each tab's data lives on the backend

use std::collections::HashMap;

use ideck_core::prelude::*;
use ideck_core::TabId;
use url::Url;

/// Default health check path, relative to the base URL.
pub const DEFAULT_HEALTH_PATH: &str = "api/insights/test";

/// Default base URL of the insights backend.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default path for a tab, relative to the base URL.
pub fn default_path(tab: TabId) -> &'static str {
    match tab {
        TabId::Overview => "api/insights/overview",
        TabId::Concepts => "api/insights/concepts",
        TabId::Memories => "api/insights/memories",
        TabId::Evolution => "api/insights/consciousness-evolution",
        TabId::Performance => "api/insights/performance",
        TabId::Realtime => "api/insights/realtime-consciousness",
        TabId::KnowledgeGraph => "api/insights/knowledge-graph-intelligence",
        TabId::Agents => "api/insights/agent-intelligence",
        TabId::DeepAnalytics => "api/insights/deep-analytics",
    }
}

/// Resolved endpoint URLs for the health check and every tab.
///
/// Paths are always relative to the base URL: a leading `/` is ignored so a
/// base of `http://host/prefix` keeps its prefix.
#[derive(Debug, Clone)]
pub struct EndpointTable {
    base: Url,
    health: Url,
    tabs: HashMap<TabId, Url>,
}

impl EndpointTable {
    /// Build the table with default paths for every tab.
    pub fn new(base_url: &str) -> Result<Self> {
        let base = parse_base_url(base_url)?;
        let health = join(&base, DEFAULT_HEALTH_PATH)?;
        let tabs = TabId::ALL
            .iter()
            .map(|&tab| join(&base, default_path(tab)).map(|url| (tab, url)))
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self { base, health, tabs })
    }

    /// Override the health check path.
    pub fn with_health_path(mut self, path: &str) -> Result<Self> {
        self.health = join(&self.base, path)?;
        Ok(self)
    }

    /// Override the path of one tab.
    pub fn with_tab_path(mut self, tab: TabId, path: &str) -> Result<Self> {
        let url = join(&self.base, path)?;
        self.tabs.insert(tab, url);
        Ok(self)
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn health_url(&self) -> &Url {
        &self.health
    }

    pub fn tab_url(&self, tab: TabId) -> &Url {
        // Every TabId is inserted in `new`, overrides only replace entries.
        &self.tabs[&tab]
    }
}

/// Parse and normalise the base URL so relative joins append to its path.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut base =
        Url::parse(raw.trim()).map_err(|e| Error::invalid_url(format!("{raw}: {e}")))?;

    if !matches!(base.scheme(), "http" | "https") {
        return Err(Error::invalid_url(format!(
            "{raw}: scheme must be http or https"
        )));
    }

    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.set_query(None);
    base.set_fragment(None);

    Ok(base)
}

fn join(base: &Url, path: &str) -> Result<Url> {
    base.join(path.trim_start_matches('/'))
        .map_err(|e| Error::invalid_url(format!("{path}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_resolves_every_tab() {
        let table = EndpointTable::new("http://localhost:8000").unwrap();

        assert_eq!(
            table.health_url().as_str(),
            "http://localhost:8000/api/insights/test"
        );
        assert_eq!(
            table.tab_url(TabId::Concepts).as_str(),
            "http://localhost:8000/api/insights/concepts"
        );
        for tab in TabId::ALL {
            assert!(table
                .tab_url(tab)
                .as_str()
                .starts_with("http://localhost:8000/api/insights/"));
        }
    }

    #[test]
    fn test_base_prefix_is_kept() {
        let table = EndpointTable::new("https://example.com/backend").unwrap();
        assert_eq!(
            table.tab_url(TabId::Agents).as_str(),
            "https://example.com/backend/api/insights/agent-intelligence"
        );
    }

    #[test]
    fn test_leading_slash_in_override_stays_under_base() {
        let table = EndpointTable::new("http://host/prefix/")
            .unwrap()
            .with_tab_path(TabId::Memories, "/v2/memories")
            .unwrap()
            .with_health_path("/healthz")
            .unwrap();

        assert_eq!(
            table.tab_url(TabId::Memories).as_str(),
            "http://host/prefix/v2/memories"
        );
        assert_eq!(table.health_url().as_str(), "http://host/prefix/healthz");
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = EndpointTable::new("ftp://host").unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_rejects_garbage() {
        let err = EndpointTable::new("not a url").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }
}
