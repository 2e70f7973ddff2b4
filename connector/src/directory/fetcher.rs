//! Authenticated JSON fetcher for the remote document API.
//!
//! [`JsonFetcher`] is the single seam between the directory clients and the
//! network. [`HttpJsonFetcher`] performs real requests with reqwest, and
//! [`mock::MockJsonFetcher`] (behind the `test-utils` feature) replays canned
//! responses and records every call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde_json::Value;

use super::error::DirectoryError;
use crate::config::RemoteConfig;

/// Whether a fetch must carry a `pageSize` query parameter.
///
/// Direct "fetch by id" endpoints reject the parameter, so it is chosen per
/// call rather than stored on the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    Unpaged,
    PageSize(u32),
}

impl Paging {
    /// Append the page size to `url` when paging is requested.
    #[must_use]
    pub fn apply_to(self, url: &str) -> String {
        match self {
            Self::Unpaged => url.to_owned(),
            Self::PageSize(size) => {
                let separator = if url.contains('?') { '&' } else { '?' };
                format!("{url}{separator}pageSize={size}")
            }
        }
    }
}

/// GET a URL and decode the body as JSON.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    /// Fetch `url`, appending the page size when `paging` asks for it.
    ///
    /// Only HTTP 200 counts as success.
    async fn fetch(&self, url: &str, paging: Paging) -> Result<Value, DirectoryError>;
}

/// reqwest-backed [`JsonFetcher`] sending a fixed `Authorization` header.
pub struct HttpJsonFetcher {
    client: reqwest::Client,
    authorization: String,
}

impl HttpJsonFetcher {
    /// Create a fetcher with a default reqwest client.
    pub fn new(authorization: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            authorization: authorization.into(),
        }
    }

    /// Create a fetcher with a custom `reqwest::Client` (timeouts, proxies, TLS).
    pub fn with_client(client: reqwest::Client, authorization: impl Into<String>) -> Self {
        Self {
            client,
            authorization: authorization.into(),
        }
    }

    /// Build a fetcher from the `remote` configuration section.
    ///
    /// Without `timeout_secs` the transport default applies.
    ///
    /// # Errors
    /// Returns [`DirectoryError::Transport`] if the HTTP client cannot be built.
    pub fn from_config(config: &RemoteConfig) -> Result<Self, DirectoryError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self::with_client(builder.build()?, &config.authorization))
    }
}

#[async_trait]
impl JsonFetcher for HttpJsonFetcher {
    async fn fetch(&self, url: &str, paging: Paging) -> Result<Value, DirectoryError> {
        let url = paging.apply_to(url);
        tracing::debug!(%url, "fetching remote document");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, &self.authorization)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!(%url, status = status.as_u16(), "remote service refused request");
            return Err(DirectoryError::RemoteService {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| DirectoryError::ResponseDecode(e.to_string()))
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::missing_const_for_fn,
    clippy::must_use_candidate
)]
pub mod mock {
    //! Mock implementation for unit testing.

    use super::{DirectoryError, JsonFetcher, Paging, Value};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays queued responses in order and records every request.
    ///
    /// Once the queue is empty every fetch answers with a 404.
    pub struct MockJsonFetcher {
        responses: Mutex<VecDeque<Result<Value, DirectoryError>>>,
        calls: Mutex<Vec<(String, Paging)>>,
    }

    impl MockJsonFetcher {
        pub fn new() -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Queue a successful JSON response.
        pub fn push_json(&self, value: Value) {
            self.push_result(Ok(value));
        }

        /// Queue an arbitrary result.
        pub fn push_result(&self, result: Result<Value, DirectoryError>) {
            self.responses.lock().unwrap().push_back(result);
        }

        /// Every `(url, paging)` pair passed to `fetch`.
        pub fn calls(&self) -> Vec<(String, Paging)> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl Default for MockJsonFetcher {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl JsonFetcher for MockJsonFetcher {
        async fn fetch(&self, url: &str, paging: Paging) -> Result<Value, DirectoryError> {
            self.calls.lock().unwrap().push((url.to_owned(), paging));

            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(DirectoryError::RemoteService { status: 404 }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpaged_leaves_url_alone() {
        assert_eq!(
            Paging::Unpaged.apply_to("http://localhost/api/v1/id/abc"),
            "http://localhost/api/v1/id/abc"
        );
    }

    #[test]
    fn paged_appends_to_existing_query() {
        assert_eq!(
            Paging::PageSize(200).apply_to("http://localhost/api/v1/path///@search?query=x"),
            "http://localhost/api/v1/path///@search?query=x&pageSize=200"
        );
    }

    #[test]
    fn paged_starts_query_when_missing() {
        assert_eq!(
            Paging::PageSize(50).apply_to("http://localhost/api/v1/children"),
            "http://localhost/api/v1/children?pageSize=50"
        );
    }

    #[tokio::test]
    async fn mock_replays_in_order_then_404s() {
        let mock = mock::MockJsonFetcher::new();
        mock.push_json(serde_json::json!({"uid": "a"}));

        let first = mock.fetch("u1", Paging::Unpaged).await.unwrap();
        assert_eq!(first["uid"], "a");

        let second = mock.fetch("u2", Paging::PageSize(10)).await;
        assert!(matches!(
            second,
            Err(DirectoryError::RemoteService { status: 404 })
        ));

        assert_eq!(
            mock.calls(),
            vec![
                ("u1".to_string(), Paging::Unpaged),
                ("u2".to_string(), Paging::PageSize(10)),
            ]
        );
    }
}
