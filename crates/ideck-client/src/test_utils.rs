//! Test utilities for the insights client
//!
//! - [`TestServer`]: an axum server on a random local port that answers
//!   routed paths with canned responses and counts hits per path.
//! - [`FakeSource`]: an in-memory [`InsightsSource`] with scripted replies and
//!   call counters, for driving the engine without sockets.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use ideck_core::prelude::*;
use ideck_core::{Envelope, TabId, TabPayload};
use serde_json::Value;
use tokio::net::TcpListener;

use crate::client::InsightsSource;

// ─────────────────────────────────────────────────────────────────────────────
// Canned HTTP server
// ─────────────────────────────────────────────────────────────────────────────

/// Response served for a route.
#[derive(Debug, Clone)]
pub struct CannedResponse {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl CannedResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: None,
        }
    }

    /// 200 with `{"status":"success"}` merged into the given JSON object.
    pub fn success(fields_json: &str) -> Self {
        let mut value: Value =
            serde_json::from_str(fields_json).expect("canned success body must be JSON");
        if let Value::Object(map) = &mut value {
            map.insert("status".to_string(), Value::String("success".to_string()));
        }
        Self::new(200, value.to_string())
    }

    /// Delay the response, to exercise timeouts and in-flight races.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Builder for [`TestServer`].
#[derive(Debug, Default)]
pub struct TestServerBuilder {
    routes: HashMap<String, CannedResponse>,
}

impl TestServerBuilder {
    /// Route an absolute path such as `/api/insights/concepts`.
    pub fn route(mut self, path: &str, response: CannedResponse) -> Self {
        self.routes.insert(path.to_string(), response);
        self
    }

    pub async fn start(self) -> TestServer {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test server");
        let addr = listener.local_addr().expect("test server address");

        let state = Arc::new(ServerState {
            routes: self.routes,
            hits: Mutex::default(),
        });
        let router = Router::new()
            .fallback(serve_canned)
            .with_state(Arc::clone(&state));

        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                debug!("test server stopped: {}", e);
            }
        });

        TestServer { addr, state, task }
    }
}

#[derive(Debug)]
struct ServerState {
    routes: HashMap<String, CannedResponse>,
    hits: Mutex<HashMap<String, usize>>,
}

/// Running canned-response server. Stops when dropped.
pub struct TestServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
    task: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub fn builder() -> TestServerBuilder {
        TestServerBuilder::default()
    }

    /// Base URL to hand to `EndpointTable::new`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of requests received for `path`.
    pub fn hits(&self, path: &str) -> usize {
        self.state
            .hits
            .lock()
            .map(|hits| hits.get(path).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Total number of requests received.
    pub fn total_hits(&self) -> usize {
        self.state
            .hits
            .lock()
            .map(|hits| hits.values().sum())
            .unwrap_or(0)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Fallback handler: count the hit, then answer with the routed response
/// or a 404 error envelope.
async fn serve_canned(State(state): State<Arc<ServerState>>, uri: Uri) -> Response {
    let path = uri.path().to_string();
    if let Ok(mut hits) = state.hits.lock() {
        *hits.entry(path.clone()).or_insert(0) += 1;
    }

    let response = state
        .routes
        .get(&path)
        .cloned()
        .unwrap_or_else(|| CannedResponse::new(404, r#"{"status":"error","detail":"not found"}"#));

    if let Some(delay) = response.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        response.body,
    )
        .into_response()
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory source
// ─────────────────────────────────────────────────────────────────────────────

/// Scripted outcome of a [`FakeSource`] call.
#[derive(Debug, Clone)]
pub enum FakeReply {
    /// `{"status":"success", ...fields}`; the value must be a JSON object.
    Success(Value),
    /// 2xx with a non-success status string.
    Status(String),
    /// Non-2xx HTTP status.
    HttpStatus(u16),
    /// Transport failure (connection refused, timeout...).
    Transport(String),
}

impl FakeReply {
    fn into_payload(self, url: &str) -> Result<TabPayload> {
        match self {
            FakeReply::Success(fields) => {
                let mut value = fields;
                if let Value::Object(map) = &mut value {
                    map.insert("status".to_string(), Value::String("success".to_string()));
                }
                Envelope::from_value(value)?.into_payload()
            }
            FakeReply::Status(status) => Err(Error::envelope(status)),
            FakeReply::HttpStatus(code) => Err(Error::http_status(code, url)),
            FakeReply::Transport(message) => Err(Error::http(message)),
        }
    }
}

#[derive(Debug, Default)]
struct FakeState {
    health: Option<FakeReply>,
    tabs: HashMap<TabId, FakeReply>,
    health_calls: usize,
    tab_calls: HashMap<TabId, usize>,
}

/// In-memory [`InsightsSource`].
///
/// Unscripted calls succeed: the health check returns `Ok` and every tab
/// returns an empty payload.
#[derive(Debug, Clone, Default)]
pub struct FakeSource {
    state: Arc<Mutex<FakeState>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_health(&self, reply: FakeReply) {
        self.with_state(|s| s.health = Some(reply));
    }

    pub fn set_tab(&self, tab: TabId, reply: FakeReply) {
        self.with_state(|s| {
            s.tabs.insert(tab, reply);
        });
    }

    pub fn health_calls(&self) -> usize {
        self.with_state(|s| s.health_calls)
    }

    pub fn tab_calls(&self, tab: TabId) -> usize {
        self.with_state(|s| s.tab_calls.get(&tab).copied().unwrap_or(0))
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        let mut guard = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

impl InsightsSource for FakeSource {
    async fn check_health(&self) -> Result<()> {
        let reply = self.with_state(|s| {
            s.health_calls += 1;
            s.health.clone()
        });
        match reply {
            None => Ok(()),
            Some(reply) => reply.into_payload("fake://health").map(|_| ()),
        }
    }

    async fn fetch_tab(&self, tab: TabId) -> Result<TabPayload> {
        let reply = self.with_state(|s| {
            *s.tab_calls.entry(tab).or_insert(0) += 1;
            s.tabs.get(&tab).cloned()
        });
        match reply {
            None => Ok(TabPayload::default()),
            Some(reply) => reply.into_payload(&format!("fake://{tab}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fake_source_defaults_to_success() {
        let source = FakeSource::new();
        source.check_health().await.unwrap();
        let payload = source.fetch_tab(TabId::Agents).await.unwrap();

        assert!(payload.is_empty());
        assert_eq!(source.health_calls(), 1);
        assert_eq!(source.tab_calls(TabId::Agents), 1);
        assert_eq!(source.tab_calls(TabId::Concepts), 0);
    }

    #[tokio::test]
    async fn test_fake_source_scripted_replies() {
        let source = FakeSource::new();
        source.set_health(FakeReply::HttpStatus(500));
        source.set_tab(TabId::Concepts, FakeReply::Success(json!({"total_concepts": 18})));
        source.set_tab(TabId::Memories, FakeReply::Status("error".into()));

        assert!(matches!(
            source.check_health().await,
            Err(Error::HttpStatus { status: 500, .. })
        ));
        let payload = source.fetch_tab(TabId::Concepts).await.unwrap();
        assert_eq!(payload.get("total_concepts"), Some(&json!(18)));
        assert!(matches!(
            source.fetch_tab(TabId::Memories).await,
            Err(Error::Envelope { .. })
        ));
    }

    #[tokio::test]
    async fn test_server_counts_hits_and_serves_404() {
        let server = TestServer::builder()
            .route("/a", CannedResponse::new(200, r#"{"status":"success"}"#))
            .start()
            .await;
        let http = reqwest::Client::new();

        let ok = http
            .get(format!("{}/a?x=1", server.base_url()))
            .send()
            .await
            .unwrap();
        assert_eq!(ok.status().as_u16(), 200);
        assert_eq!(
            ok.headers()["content-type"].to_str().unwrap(),
            "application/json"
        );
        assert_eq!(ok.text().await.unwrap(), r#"{"status":"success"}"#);

        let missing = http
            .get(format!("{}/missing", server.base_url()))
            .send()
            .await
            .unwrap();
        assert_eq!(missing.status().as_u16(), 404);

        assert_eq!(server.hits("/a"), 1);
        assert_eq!(server.hits("/missing"), 1);
        assert_eq!(server.total_hits(), 2);
    }

    #[tokio::test]
    async fn test_server_applies_delay_and_status() {
        let server = TestServer::builder()
            .route(
                "/slow",
                CannedResponse::new(503, "{}").with_delay(Duration::from_millis(50)),
            )
            .start()
            .await;

        let started = std::time::Instant::now();
        let response = reqwest::get(format!("{}/slow", server.base_url()))
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 503);
        assert!(started.elapsed() >= Duration::from_millis(50));
    }
}
