//! URL and NXQL construction for the remote document API.

use std::borrow::Cow;

use thiserror::Error;

/// Filter shared by every document query: not hidden, not a version, not trashed.
pub const DOCUMENT_FILTER: &str = "ecm:mixinType != 'HiddenInNavigation' \
     AND ecm:isCheckedInVersion = 0 \
     AND ecm:currentLifeCycleState != 'deleted'";

/// The search URL could not be assembled.
#[derive(Debug, Error)]
#[error("invalid search URI {url}: {reason}")]
pub struct EncodingError {
    pub url: String,
    pub reason: String,
}

/// Ensure the base URL ends with a slash so endpoint paths can be appended.
#[must_use]
pub fn normalize_base_url(base_url: &str) -> String {
    if base_url.ends_with('/') {
        base_url.to_owned()
    } else {
        format!("{base_url}/")
    }
}

/// Query for every non-hidden, non-version, non-deleted document whose title
/// contains `text`, ignoring case.
#[must_use]
pub fn title_query(text: &str) -> String {
    format!(
        "SELECT * FROM Document WHERE dc:title ILIKE '%{}%' AND {DOCUMENT_FILTER}",
        escape_literal(text)
    )
}

/// Query listing every non-hidden, non-version, non-deleted document.
#[must_use]
pub fn listing_query() -> String {
    format!("SELECT * FROM Document WHERE {DOCUMENT_FILTER}")
}

/// Escape text for use inside a single-quoted NXQL literal.
fn escape_literal(text: &str) -> Cow<'_, str> {
    if text.contains(['\'', '\\']) {
        Cow::Owned(text.replace('\\', "\\\\").replace('\'', "\\'"))
    } else {
        Cow::Borrowed(text)
    }
}

/// `{base}id/{id}`: direct access to one document.
#[must_use]
pub fn entry_url(base_url: &str, id: &str) -> String {
    format!("{base_url}id/{}", urlencoding::encode(id))
}

/// `{base}path///@search?query={nxql}` with the query percent-encoded.
///
/// # Errors
/// Returns [`EncodingError`] when the result is not a valid absolute URL.
pub fn search_url(base_url: &str, nxql: &str) -> Result<String, EncodingError> {
    let url = format!(
        "{base_url}path///@search?query={}",
        urlencoding::encode(nxql)
    );
    match reqwest::Url::parse(&url) {
        Ok(_) => Ok(url),
        Err(e) => Err(EncodingError {
            url,
            reason: e.to_string(),
        }),
    }
}
