//! Common test utilities for integration tests.
//!
//! - [`http_mock::MockHttpServer`] - wiremock-backed stand-in for the remote document API
//! - Document fixtures shaped like the remote JSON responses

#![allow(dead_code)]

pub mod http_mock;

use serde_json::{json, Value};

/// Authorization header value every stub expects.
pub const TEST_AUTHORIZATION: &str = "Basic QWRtaW5pc3RyYXRvcjpBZG1pbmlzdHJhdG9y";

/// A document as returned by `GET {base}id/{uid}`.
pub fn document(uid: &str, title: &str) -> Value {
    json!({
        "entity-type": "document",
        "repository": "default",
        "uid": uid,
        "path": format!("/default-domain/workspaces/{uid}"),
        "type": "File",
        "state": "project",
        "isCheckedOut": true,
        "title": title,
        "lastModified": "2014-03-12T10:21:44.00Z",
        "properties": {"dc:title": title}
    })
}

/// A single-page search response wrapping `entries`.
pub fn search_page(entries: Vec<Value>) -> Value {
    let count = entries.len();
    json!({
        "entity-type": "documents",
        "isPaginable": true,
        "resultsCount": count,
        "pageSize": 200,
        "currentPageSize": count,
        "currentPageIndex": 0,
        "numberOfPages": 1,
        "entries": entries
    })
}
