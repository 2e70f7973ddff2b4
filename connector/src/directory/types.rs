//! Data types shared by both directory clients.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::DirectoryError;

/// Field that carries the document id in remote JSON.
pub const ID_FIELD: &str = "uid";

/// Field that carries the display value in remote JSON.
pub const LABEL_FIELD: &str = "title";

/// Lifecycle flag added to entries served from the in-memory cache.
pub const OBSOLETE_FIELD: &str = "obsolete";

/// One resolvable directory record.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Entry {
    /// Remote document uid, stable across fetches.
    pub id: String,
    /// Remote document title, when the document has one.
    pub label: Option<String>,
    /// Remaining scalar fields of the document, rendered as strings.
    pub extra_fields: BTreeMap<String, String>,
}

impl Entry {
    /// Map a remote JSON document to an entry.
    ///
    /// `uid` becomes the id and `title` the label. Other string, number and
    /// boolean fields are kept in `extra_fields`; nulls, arrays and nested
    /// objects are dropped.
    ///
    /// # Errors
    /// Returns a short reason when the value is not an object or has no
    /// string `uid`.
    pub fn from_document(document: &Value) -> Result<Self, &'static str> {
        let id = document_uid(document)?;
        let Some(fields) = document.as_object() else {
            return Err("not a JSON object");
        };

        let label = fields
            .get(LABEL_FIELD)
            .and_then(Value::as_str)
            .map(str::to_owned);

        let extra_fields = fields
            .iter()
            .filter(|(key, _)| key.as_str() != ID_FIELD && key.as_str() != LABEL_FIELD)
            .filter_map(|(key, value)| scalar_text(value).map(|text| (key.clone(), text)))
            .collect();

        Ok(Self {
            id: id.to_owned(),
            label,
            extra_fields,
        })
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Read the `uid` of one element of an `entries` array.
///
/// # Errors
/// Returns a short reason describing why the element has no usable id.
pub fn document_uid(document: &Value) -> Result<&str, &'static str> {
    match document {
        Value::Null => Err("null element"),
        Value::Object(fields) => fields
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .ok_or("missing string `uid`"),
        _ => Err("not a JSON object"),
    }
}

/// Borrow the `entries` array of a search response.
///
/// # Errors
/// Returns [`DirectoryError::ResponseDecode`] when the response has no
/// `entries` array.
pub fn entries_array(page: &Value) -> Result<&[Value], DirectoryError> {
    page.get("entries")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| DirectoryError::ResponseDecode("response has no `entries` array".into()))
}

/// Filter accepted by `search`. Only the label is recognized.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryFilter {
    #[serde(default)]
    pub label: Option<String>,
}

impl QueryFilter {
    /// Filter on the given label text.
    pub fn label(text: impl Into<String>) -> Self {
        Self {
            label: Some(text.into()),
        }
    }

    /// The search text, empty when no label was given.
    #[must_use]
    pub fn search_text(&self) -> &str {
        self.label.as_deref().unwrap_or_default()
    }
}

/// Paging metadata reported alongside `entries` by the search endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub number_of_pages: Option<u64>,
    pub current_page_size: Option<u64>,
    pub results_count: Option<u64>,
}

impl PageInfo {
    #[must_use]
    pub fn from_page(page: &Value) -> Self {
        let field = |name: &str| page.get(name).and_then(Value::as_u64);
        Self {
            number_of_pages: field("numberOfPages"),
            current_page_size: field("currentPageSize"),
            results_count: field("resultsCount"),
        }
    }

    /// Whether the remote result set spans more than the page we received.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.number_of_pages.is_some_and(|pages| pages > 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_uid_and_title() {
        let doc = json!({
            "entity-type": "document",
            "uid": "5d3b0a4e",
            "title": "Quarterly report",
            "path": "/default-domain/workspaces/report",
            "isCheckedOut": true,
            "properties": {"dc:title": "Quarterly report"}
        });

        let entry = Entry::from_document(&doc).expect("maps");
        assert_eq!(entry.id, "5d3b0a4e");
        assert_eq!(entry.label.as_deref(), Some("Quarterly report"));
        assert_eq!(entry.extra_fields["entity-type"], "document");
        assert_eq!(entry.extra_fields["isCheckedOut"], "true");
        assert!(!entry.extra_fields.contains_key("properties"));
        assert!(!entry.extra_fields.contains_key("uid"));
    }

    #[test]
    fn missing_title_leaves_label_empty() {
        let entry = Entry::from_document(&json!({"uid": "x"})).expect("maps");
        assert!(entry.label.is_none());
    }

    #[test]
    fn rejects_documents_without_uid() {
        assert_eq!(
            Entry::from_document(&json!({"title": "orphan"})),
            Err("missing string `uid`")
        );
        assert_eq!(
            Entry::from_document(&json!({"uid": 42})),
            Err("missing string `uid`")
        );
        assert_eq!(Entry::from_document(&json!(null)), Err("null element"));
        assert_eq!(Entry::from_document(&json!([1, 2])), Err("not a JSON object"));
    }

    #[test]
    fn entries_array_requires_entries_key() {
        let page = json!({"entries": [{"uid": "a"}]});
        assert_eq!(entries_array(&page).expect("present").len(), 1);

        let err = entries_array(&json!({"results": []})).unwrap_err();
        assert!(matches!(err, DirectoryError::ResponseDecode(_)));
    }

    #[test]
    fn filter_search_text_defaults_to_empty() {
        assert_eq!(QueryFilter::default().search_text(), "");
        assert_eq!(QueryFilter::label("abc").search_text(), "abc");
    }

    #[test]
    fn page_info_detects_truncation() {
        let page = json!({
            "entries": [],
            "numberOfPages": 3,
            "currentPageSize": 200,
            "resultsCount": 512
        });
        let info = PageInfo::from_page(&page);
        assert!(info.is_truncated());
        assert_eq!(info.results_count, Some(512));

        assert!(!PageInfo::from_page(&json!({"numberOfPages": 1})).is_truncated());
        assert!(!PageInfo::from_page(&json!({})).is_truncated());
    }
}
