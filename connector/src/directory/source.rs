//! The caller-facing directory contract.

use async_trait::async_trait;

use super::error::{Diagnosed, DirectoryError};
use super::types::{Entry, QueryFilter};

/// A source of directory entries that a lookup or suggestion widget can query.
#[async_trait]
pub trait DirectorySource: Send + Sync {
    /// Resolve one entry by id.
    ///
    /// `Ok(None)` means the id is unknown or the remote document could not
    /// be mapped to an entry.
    async fn get_entry(&self, id: &str) -> Result<Option<Entry>, DirectoryError>;

    /// Whether `get_entry(id)` resolves to an entry.
    async fn has_entry(&self, id: &str) -> Result<bool, DirectoryError> {
        Ok(self.get_entry(id).await?.is_some())
    }

    /// Every entry the source can enumerate without a search text.
    async fn list_all_entries(&self) -> Result<Vec<Entry>, DirectoryError>;

    /// Ids of the entries matching `filter`, in source order.
    ///
    /// `fulltext` is part of the host contract; neither client uses it.
    async fn search(
        &self,
        filter: &QueryFilter,
        fulltext: &[String],
    ) -> Result<Diagnosed<Vec<String>>, DirectoryError>;
}

/// Run a search and resolve each matching id to its entry.
///
/// This is the suggestion-box flow: one search followed by one `get_entry`
/// per id. Ids that no longer resolve are dropped.
///
/// # Errors
/// Propagates the first fetch failure from the search or any lookup.
pub async fn suggest(
    source: &dyn DirectorySource,
    filter: &QueryFilter,
) -> Result<Diagnosed<Vec<Entry>>, DirectoryError> {
    let Diagnosed { value: ids, warnings } = source.search(filter, &[]).await?;

    let mut entries = Vec::with_capacity(ids.len());
    for id in &ids {
        match source.get_entry(id).await? {
            Some(entry) => entries.push(entry),
            None => tracing::warn!("search returned {id} but it no longer resolves"),
        }
    }

    Ok(Diagnosed::with_warnings(entries, warnings))
}
