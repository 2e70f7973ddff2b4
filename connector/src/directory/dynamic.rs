//! Directory client that queries the remote service on every call.
//!
//! Each search issues one NXQL query; each label lookup fetches the document
//! by id. Resolving a page of suggestions therefore costs one search plus one
//! fetch per hit, trading latency for always-fresh titles.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::{Diagnosed, DirectoryError, DirectoryWarning};
use super::fetcher::{JsonFetcher, Paging};
use super::query;
use super::source::DirectorySource;
use super::types::{document_uid, entries_array, Entry, QueryFilter};
use crate::config::RemoteConfig;

/// [`DirectorySource`] that issues one remote request per lookup or search.
pub struct DynamicDirectory {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
    page_size: u32,
}

impl DynamicDirectory {
    /// Create a client rooted at `base_url` that requests `page_size` hits per search.
    pub fn new(fetcher: Arc<dyn JsonFetcher>, base_url: &str, page_size: u32) -> Self {
        Self {
            fetcher,
            base_url: query::normalize_base_url(base_url),
            page_size,
        }
    }

    pub fn from_config(fetcher: Arc<dyn JsonFetcher>, config: &RemoteConfig) -> Self {
        Self::new(fetcher, &config.base_url, config.search_page_size)
    }
}

#[async_trait]
impl DirectorySource for DynamicDirectory {
    async fn get_entry(&self, id: &str) -> Result<Option<Entry>, DirectoryError> {
        let url = query::entry_url(&self.base_url, id);
        let document = self.fetcher.fetch(&url, Paging::Unpaged).await?;

        match Entry::from_document(&document) {
            Ok(entry) => Ok(Some(entry)),
            Err(reason) => {
                tracing::error!("unable to map document {id} to an entry: {reason}");
                Ok(None)
            }
        }
    }

    async fn list_all_entries(&self) -> Result<Vec<Entry>, DirectoryError> {
        // Enumeration would need a query string; only search is supported.
        Ok(Vec::new())
    }

    async fn search(
        &self,
        filter: &QueryFilter,
        _fulltext: &[String],
    ) -> Result<Diagnosed<Vec<String>>, DirectoryError> {
        let text = filter.search_text();
        if text.is_empty() {
            return Ok(Diagnosed::clean(Vec::new()));
        }

        let url = match query::search_url(&self.base_url, &query::title_query(text)) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("failed to encode the search URI: {e}");
                let warning = DirectoryWarning::Encoding {
                    reason: e.to_string(),
                };
                return Ok(Diagnosed::with_warnings(Vec::new(), vec![warning]));
            }
        };

        let page = self
            .fetcher
            .fetch(&url, Paging::PageSize(self.page_size))
            .await?;
        let entries = entries_array(&page)?;

        let mut ids = Vec::with_capacity(entries.len());
        let mut warnings = Vec::new();
        for (index, element) in entries.iter().enumerate() {
            match document_uid(element) {
                Ok(uid) => ids.push(uid.to_owned()),
                Err(reason) => {
                    let warning = DirectoryWarning::MalformedEntry {
                        index,
                        reason: reason.to_owned(),
                    };
                    tracing::warn!("{warning}");
                    warnings.push(warning);
                }
            }
        }

        tracing::debug!(text, hits = ids.len(), "title search completed");
        Ok(Diagnosed::with_warnings(ids, warnings))
    }
}
