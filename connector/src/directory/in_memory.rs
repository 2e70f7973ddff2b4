//! Directory client that fetches the whole listing once and filters locally.
//!
//! The listing is a single page of `bulk_page_size` documents. When the remote
//! result set is larger, the surplus is dropped and a truncation warning is
//! raised; no further pages are requested.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::OnceCell;

use super::error::{Diagnosed, DirectoryError, DirectoryWarning};
use super::fetcher::{JsonFetcher, Paging};
use super::query::{self, EncodingError};
use super::source::DirectorySource;
use super::types::{entries_array, Entry, PageInfo, QueryFilter, OBSOLETE_FIELD};
use crate::config::RemoteConfig;

/// Entries from one bulk fetch, in remote order, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct EntryCache {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl EntryCache {
    /// Build a cache from the `entries` array of a listing response.
    ///
    /// Elements without a usable `uid` are skipped, and a repeated id keeps
    /// its first occurrence.
    #[must_use]
    pub fn from_documents(documents: &[Value]) -> Diagnosed<Self> {
        let mut cache = Self::default();
        let mut warnings = Vec::new();

        for (index, document) in documents.iter().enumerate() {
            let warning = match Entry::from_document(document) {
                Ok(entry) if cache.index.contains_key(&entry.id) => {
                    DirectoryWarning::DuplicateEntry { id: entry.id }
                }
                Ok(entry) => {
                    cache.index.insert(entry.id.clone(), cache.entries.len());
                    cache.entries.push(entry);
                    continue;
                }
                Err(reason) => DirectoryWarning::MalformedEntry {
                    index,
                    reason: reason.to_owned(),
                },
            };
            tracing::warn!("{warning}");
            warnings.push(warning);
        }

        Diagnosed::with_warnings(cache, warnings)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.index.get(id).map(|&position| &self.entries[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids of labelled entries whose label contains `text`, ignoring case.
    ///
    /// An empty `text` is contained in every label.
    #[must_use]
    pub fn matching_ids(&self, text: &str) -> Vec<String> {
        let needle = text.to_lowercase();
        self.entries
            .iter()
            .filter(|entry| {
                entry
                    .label
                    .as_ref()
                    .is_some_and(|label| label.to_lowercase().contains(&needle))
            })
            .map(|entry| entry.id.clone())
            .collect()
    }
}

/// Copy of a cached entry carrying the `obsolete = 0` lifecycle flag that
/// standard directory filters expect.
fn with_lifecycle_flag(entry: &Entry) -> Entry {
    let mut entry = entry.clone();
    entry
        .extra_fields
        .insert(OBSOLETE_FIELD.to_owned(), "0".to_owned());
    entry
}

/// [`DirectorySource`] that serves lookups and searches from one cached listing page.
///
/// Searches carry the warnings raised while that listing was loaded.
pub struct InMemoryDirectory {
    fetcher: Arc<dyn JsonFetcher>,
    bulk_url: String,
    page_size: u32,
    cache: OnceCell<Diagnosed<EntryCache>>,
}

impl InMemoryDirectory {
    /// Create a client that loads `bulk_url` on first use.
    pub fn new(fetcher: Arc<dyn JsonFetcher>, bulk_url: impl Into<String>, page_size: u32) -> Self {
        Self {
            fetcher,
            bulk_url: bulk_url.into(),
            page_size,
            cache: OnceCell::new(),
        }
    }

    /// Create a client whose listing is `remote.bulk_query` run through the search endpoint.
    ///
    /// # Errors
    /// Returns [`EncodingError`] if the listing URL is not a valid URL.
    pub fn from_config(
        fetcher: Arc<dyn JsonFetcher>,
        config: &RemoteConfig,
    ) -> Result<Self, EncodingError> {
        let base_url = query::normalize_base_url(&config.base_url);
        let bulk_url = query::search_url(&base_url, &config.bulk_query)?;
        Ok(Self::new(fetcher, bulk_url, config.bulk_page_size))
    }

    /// Whether the listing has been fetched.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cache.initialized()
    }

    /// Refetch the listing and replace the cache wholesale.
    ///
    /// On failure the previous cache, if any, is kept.
    ///
    /// # Errors
    /// Returns the fetch or decode error of the listing request.
    pub async fn refresh(&mut self) -> Result<Diagnosed<usize>, DirectoryError> {
        let loaded = self.load().await?;
        let report = Diagnosed::with_warnings(loaded.value.len(), loaded.warnings.clone());
        self.cache = OnceCell::from(loaded);
        tracing::info!(entries = report.value, "directory cache refreshed");
        Ok(report)
    }

    async fn cache(&self) -> Result<&Diagnosed<EntryCache>, DirectoryError> {
        self.cache.get_or_try_init(|| self.load()).await
    }

    async fn load(&self) -> Result<Diagnosed<EntryCache>, DirectoryError> {
        let page = self
            .fetcher
            .fetch(&self.bulk_url, Paging::PageSize(self.page_size))
            .await?;
        let documents = entries_array(&page)?;

        let mut warnings = Vec::new();
        let info = PageInfo::from_page(&page);
        if info.is_truncated() {
            let warning = DirectoryWarning::Truncated {
                returned: info
                    .current_page_size
                    .unwrap_or_else(|| u64::try_from(documents.len()).unwrap_or(u64::MAX)),
                total: info.results_count.unwrap_or_default(),
            };
            tracing::warn!("{warning}");
            warnings.push(warning);
        }

        let Diagnosed {
            value: cache,
            warnings: skipped,
        } = EntryCache::from_documents(documents);
        warnings.extend(skipped);

        tracing::debug!(entries = cache.len(), "loaded directory listing");
        Ok(Diagnosed::with_warnings(cache, warnings))
    }
}

#[async_trait]
impl DirectorySource for InMemoryDirectory {
    async fn get_entry(&self, id: &str) -> Result<Option<Entry>, DirectoryError> {
        Ok(self.cache().await?.value.get(id).map(with_lifecycle_flag))
    }

    async fn list_all_entries(&self) -> Result<Vec<Entry>, DirectoryError> {
        Ok(self
            .cache()
            .await?
            .value
            .iter()
            .map(with_lifecycle_flag)
            .collect())
    }

    async fn search(
        &self,
        filter: &QueryFilter,
        _fulltext: &[String],
    ) -> Result<Diagnosed<Vec<String>>, DirectoryError> {
        let Diagnosed { value, warnings } = self.cache().await?;
        Ok(Diagnosed::with_warnings(
            value.matching_ids(filter.search_text()),
            warnings.clone(),
        ))
    }
}
