//! HTTP mock server helpers for testing outbound HTTP calls.
//!
//! This module provides a thin wrapper around `wiremock` for declarative
//! HTTP stubbing of the remote document API.
//!
//! # Quick Start
//!
//! ```ignore
//! use crate::common::http_mock::MockHttpServer;
//!
//! #[tokio::test]
//! async fn test_lookup() {
//!     let server = MockHttpServer::start().await;
//!
//!     server
//!         .expect_get("id/abc")
//!         .with_header("Authorization", TEST_AUTHORIZATION)
//!         .respond_with_json(json!({"uid": "abc", "title": "Budget"}))
//!         .mount()
//!         .await;
//!
//!     // Point the client at server.api_base()
//! }
//! ```
//!
//! # Patterns
//!
//! - **Success response**: `.respond_with_json(value)` or `.respond_with_body(string)`
//! - **Error response**: `.respond_with_status(500)`
//! - **Paging checks**: `.with_query_param("pageSize", "200")` / `.without_query_param("pageSize")`
//! - **Request verification**: `.expect_times(1)` then `server.verify().await`

use std::time::Duration;

use serde_json::Value;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

/// API root path the stubs are mounted under.
pub const API_ROOT: &str = "/nuxeo/api/v1/";

/// Mock server standing in for the remote document API.
pub struct MockHttpServer {
    server: MockServer,
}

impl MockHttpServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL to hand to a directory client (ends with a slash).
    pub fn api_base(&self) -> String {
        format!("{}{API_ROOT}", self.server.uri())
    }

    /// Stub a GET on `endpoint`, relative to the API root.
    pub fn expect_get(&self, endpoint: &str) -> StubBuilder<'_> {
        StubBuilder {
            server: &self.server,
            mock: Mock::given(method("GET")).and(path(format!("{API_ROOT}{endpoint}"))),
            status: 200,
            body: None,
            delay: None,
            times: None,
        }
    }

    /// Assert every `expect_times` expectation was met.
    pub async fn verify(&self) {
        self.server.verify().await;
    }

    /// Number of requests the server has received so far.
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .as_ref()
            .map_or(0, Vec::len)
    }
}

/// Builder for one stubbed endpoint.
pub struct StubBuilder<'a> {
    server: &'a MockServer,
    mock: MockBuilder,
    status: u16,
    body: Option<Body>,
    delay: Option<Duration>,
    times: Option<u64>,
}

enum Body {
    Json(Value),
    Raw(String),
}

impl StubBuilder<'_> {
    pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.mock = self.mock.and(header(name, value));
        self
    }

    pub fn with_query_param(mut self, name: &'static str, value: &str) -> Self {
        self.mock = self.mock.and(query_param(name, value));
        self
    }

    pub fn without_query_param(mut self, name: &'static str) -> Self {
        self.mock = self.mock.and(query_param_is_missing(name));
        self
    }

    pub fn respond_with_json(mut self, body: Value) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    pub fn respond_with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Body::Raw(body.into()));
        self
    }

    pub fn respond_with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn respond_with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn expect_times(mut self, times: u64) -> Self {
        self.times = Some(times);
        self
    }

    pub async fn mount(self) {
        let mut template = ResponseTemplate::new(self.status);
        template = match self.body {
            Some(Body::Json(value)) => template.set_body_json(value),
            Some(Body::Raw(text)) => template.set_body_string(text),
            None => template,
        };
        if let Some(delay) = self.delay {
            template = template.set_delay(delay);
        }

        let mut mock = self.mock.respond_with(template);
        if let Some(times) = self.times {
            mock = mock.expect(times);
        }
        mock.mount(self.server).await;
    }
}
