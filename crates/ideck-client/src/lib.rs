//! # ideck-client - Insights Backend Access
//!
//! HTTP access to the insights REST backend. One GET per tab, one GET for the
//! health check; every response is a `{status, ...}` envelope.
//!
//! ## Public API
//!
//! - [`InsightsSource`] - Send-able async trait the app crate fetches through
//! - [`HttpInsightsClient`] - reqwest implementation with configurable timeouts
//! - [`EndpointTable`] - Base URL plus health and per-tab paths
//!
//! With the `test-helpers` feature, [`test_utils`] provides a canned-response
//! HTTP server and an in-memory fake source.

pub mod client;
pub mod endpoints;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use client::{ClientOptions, HttpInsightsClient, InsightsSource, LocalInsightsSource};
pub use endpoints::{default_path, EndpointTable, DEFAULT_BASE_URL, DEFAULT_HEALTH_PATH};
