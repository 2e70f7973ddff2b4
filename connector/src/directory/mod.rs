//! Directory lookup clients for the remote document API.
//!
//! Two strategies share one fetcher and one caller-facing contract:
//!
//! - [`DynamicDirectory`] - queries the remote service on every search and lookup
//! - [`InMemoryDirectory`] - loads one listing page, then filters locally
//!
//! Both implement [`DirectorySource`] and talk to the network only through a
//! [`JsonFetcher`], so they can be driven by [`HttpJsonFetcher`] in production
//! and by [`fetcher::mock::MockJsonFetcher`] (behind `test-utils`) in tests.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use docdir_connector::directory::{DirectorySource, DynamicDirectory, HttpJsonFetcher, QueryFilter};
//!
//! let fetcher = Arc::new(HttpJsonFetcher::new("Basic QWRtaW5pc3RyYXRvcjpBZG1pbmlzdHJhdG9y"));
//! let directory = DynamicDirectory::new(fetcher, "http://demo.nuxeo.com/nuxeo/api/v1/", 200);
//! let ids = directory.search(&QueryFilter::label("report"), &[]).await?;
//! ```

mod dynamic;
mod error;
pub mod fetcher;
mod in_memory;
pub mod query;
mod source;
mod types;

pub use dynamic::DynamicDirectory;
pub use error::{Diagnosed, DirectoryError, DirectoryWarning};
pub use fetcher::{HttpJsonFetcher, JsonFetcher, Paging};
pub use in_memory::{EntryCache, InMemoryDirectory};
pub use query::EncodingError;
pub use source::{suggest, DirectorySource};
pub use types::{Entry, PageInfo, QueryFilter, OBSOLETE_FIELD};
