//! Insights backend client
//!
//! [`InsightsSource`] is the seam between the TEA loop and the network: the
//! app crate only ever talks to the backend through it, which lets tests swap
//! in [`FakeSource`](crate::test_utils::FakeSource).

use std::time::Duration;

use ideck_core::prelude::*;
use ideck_core::{Envelope, TabId, TabPayload};
use reqwest::Client;
use url::Url;

use crate::endpoints::EndpointTable;

/// Data source for the dashboard.
#[trait_variant::make(InsightsSource: Send)]
pub trait LocalInsightsSource {
    /// Check the health endpoint. `Ok` only for a 2xx `{"status":"success"}`.
    async fn check_health(&self) -> Result<()>;

    /// Fetch one tab's payload. `Ok` only for a 2xx `{"status":"success",...}`.
    async fn fetch_tab(&self, tab: TabId) -> Result<TabPayload>;
}

/// Timeouts applied to every request.
#[derive(Debug, Clone, Copy)]
pub struct ClientOptions {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(3),
        }
    }
}

/// reqwest-backed [`InsightsSource`].
#[derive(Debug, Clone)]
pub struct HttpInsightsClient {
    client: Client,
    endpoints: EndpointTable,
}

impl HttpInsightsClient {
    /// Create a new client for the given endpoint table.
    pub fn new(endpoints: EndpointTable, options: ClientOptions) -> Result<Self> {
        let client = Client::builder()
            .timeout(options.timeout)
            .connect_timeout(options.connect_timeout)
            .build()
            .map_err(|e| Error::http(e.to_string()))?;

        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &EndpointTable {
        &self.endpoints
    }

    /// GET `url` and decode the envelope, without judging its status.
    async fn get_envelope(&self, url: &Url) -> Result<Envelope> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| map_transport_error(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::http_status(status.as_u16(), url.as_str()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| map_transport_error(e, url))?;

        Envelope::from_slice(&body)
    }
}

impl InsightsSource for HttpInsightsClient {
    async fn check_health(&self) -> Result<()> {
        let envelope = self.get_envelope(self.endpoints.health_url()).await?;
        if envelope.is_success() {
            Ok(())
        } else {
            Err(Error::envelope(envelope.status))
        }
    }

    async fn fetch_tab(&self, tab: TabId) -> Result<TabPayload> {
        self.get_envelope(self.endpoints.tab_url(tab))
            .await?
            .into_payload()
    }
}

fn map_transport_error(e: reqwest::Error, url: &Url) -> Error {
    if e.is_connect() {
        Error::http(format!("cannot connect to {url}"))
    } else if e.is_timeout() {
        Error::http(format!("request to {url} timed out"))
    } else {
        Error::http(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    // Only the Send variant: with both traits in scope the calls are ambiguous.
    use super::{ClientOptions, Duration, EndpointTable, Error, HttpInsightsClient, InsightsSource};
    use crate::test_utils::{CannedResponse, TestServer};
    use ideck_core::TabId;

    fn client_for(server: &TestServer) -> HttpInsightsClient {
        let endpoints = EndpointTable::new(&server.base_url()).unwrap();
        HttpInsightsClient::new(endpoints, ClientOptions::default()).unwrap()
    }

    #[tokio::test]
    async fn test_check_health_success() {
        let server = TestServer::builder()
            .route("/api/insights/test", CannedResponse::success("{}"))
            .start()
            .await;
        let client = client_for(&server);

        client.check_health().await.unwrap();
        assert_eq!(server.hits("/api/insights/test"), 1);
    }

    #[tokio::test]
    async fn test_check_health_http_500() {
        let server = TestServer::builder()
            .route(
                "/api/insights/test",
                CannedResponse::new(500, r#"{"detail":"boom"}"#),
            )
            .start()
            .await;
        let client = client_for(&server);

        let err = client.check_health().await.unwrap_err();
        assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_check_health_non_success_envelope() {
        let server = TestServer::builder()
            .route(
                "/api/insights/test",
                CannedResponse::new(200, r#"{"status":"degraded"}"#),
            )
            .start()
            .await;
        let client = client_for(&server);

        let err = client.check_health().await.unwrap_err();
        assert!(matches!(err, Error::Envelope { ref status } if status == "degraded"));
    }

    #[tokio::test]
    async fn test_fetch_tab_returns_payload() {
        let server = TestServer::builder()
            .route(
                "/api/insights/concepts",
                CannedResponse::success(r#"{"total_concepts":18}"#),
            )
            .start()
            .await;
        let client = client_for(&server);

        let payload = client.fetch_tab(TabId::Concepts).await.unwrap();
        assert_eq!(payload.get("total_concepts"), Some(&serde_json::json!(18)));
        assert_eq!(server.hits("/api/insights/concepts"), 1);
    }

    #[tokio::test]
    async fn test_fetch_tab_error_envelope() {
        let server = TestServer::builder()
            .route(
                "/api/insights/memories",
                CannedResponse::new(200, r#"{"status":"error","message":"no data"}"#),
            )
            .start()
            .await;
        let client = client_for(&server);

        let err = client.fetch_tab(TabId::Memories).await.unwrap_err();
        assert!(matches!(err, Error::Envelope { .. }));
    }

    #[tokio::test]
    async fn test_fetch_tab_unrouted_is_404() {
        let server = TestServer::builder().start().await;
        let client = client_for(&server);

        let err = client.fetch_tab(TabId::Agents).await.unwrap_err();
        assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_tab_invalid_json_body() {
        let server = TestServer::builder()
            .route(
                "/api/insights/performance",
                CannedResponse::new(200, "<html>oops</html>"),
            )
            .start()
            .await;
        let client = client_for(&server);

        let err = client.fetch_tab(TabId::Performance).await.unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let endpoints = EndpointTable::new(&format!("http://{addr}")).unwrap();
        let client = HttpInsightsClient::new(endpoints, ClientOptions::default()).unwrap();

        let err = client.check_health().await.unwrap_err();
        assert!(matches!(err, Error::Http { .. }));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_timeout_is_http_error() {
        let server = TestServer::builder()
            .route(
                "/api/insights/realtime-consciousness",
                CannedResponse::success("{}").with_delay(Duration::from_millis(500)),
            )
            .start()
            .await;
        let endpoints = EndpointTable::new(&server.base_url()).unwrap();
        let client = HttpInsightsClient::new(
            endpoints,
            ClientOptions {
                timeout: Duration::from_millis(100),
                connect_timeout: Duration::from_millis(100),
            },
        )
        .unwrap();

        let err = client.fetch_tab(TabId::Realtime).await.unwrap_err();
        assert!(matches!(err, Error::Http { .. }));
    }
}
