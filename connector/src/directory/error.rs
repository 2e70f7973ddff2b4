//! Failures and recovered irregularities raised while talking to the remote service.

use serde::Serialize;
use thiserror::Error;

/// Errors that abort a directory operation.
///
/// Every variant comes from the single fetch an operation performs. None of
/// them are retried.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The remote service answered with anything other than HTTP 200.
    #[error("failed to call remote service: HTTP error code {status}")]
    RemoteService { status: u16 },

    /// The body could not be parsed as JSON, or lacked the expected shape.
    #[error("error while reading JSON response: {0}")]
    ResponseDecode(String),

    /// The request never produced a response (connection, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Irregularities that were recovered locally and did not fail the operation.
///
/// They are logged when they happen and also handed back to the caller
/// through [`Diagnosed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DirectoryWarning {
    /// The search URL could not be built; no query was issued.
    #[error("failed to encode the search URI: {reason}")]
    Encoding { reason: String },

    /// An element of the `entries` array was skipped.
    #[error("skipped entry #{index}: {reason}")]
    MalformedEntry { index: usize, reason: String },

    /// A second document carried an id already present in the cache.
    #[error("skipped duplicate entry {id}")]
    DuplicateEntry { id: String },

    /// The bulk fetch reported more than one page; only the first was kept.
    #[error("got only {returned} on {total} entities")]
    Truncated { returned: u64, total: u64 },
}

/// A result paired with the warnings collected while producing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnosed<T> {
    pub value: T,
    pub warnings: Vec<DirectoryWarning>,
}

impl<T> Diagnosed<T> {
    /// Wrap a value that was produced without any warning.
    pub const fn clean(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub const fn with_warnings(value: T, warnings: Vec<DirectoryWarning>) -> Self {
        Self { value, warnings }
    }

    /// Drop the warnings and keep the value.
    pub fn into_value(self) -> T {
        self.value
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
