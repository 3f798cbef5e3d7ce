//! Domain model for the repository-search API.
//!
//! # Design
//! Field names match the wire format's snake_case directly, so no rename
//! layer is needed. `Repository::id` exists only on the client: it is
//! generated fresh on every decode so list consumers can key rows, and it
//! carries no equality or persistence meaning across fetches, which is why
//! the type does not implement `PartialEq`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::http::{HttpMethod, RequestDescriptor};

/// Envelope returned by `GET /search/repositories`.
///
/// `items` may be `null` or absent on the wire; consumers treat both as an
/// empty list, never as an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    pub total_count: u64,
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Option<Vec<Repository>>,
}

/// One repository in a search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    /// Client-side row identity, assigned on decode. Not part of the wire
    /// format.
    #[serde(skip, default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub html_url: String,
}

/// Describe the fixed search call against `base_url`.
///
/// `query` is inserted verbatim and must already be URL-encoded (e.g.
/// `rust+http`). The base URL is injectable so tests can point the call at a
/// local server; a trailing slash is tolerated.
pub fn search_repositories(
    base_url: &str,
    query: &str,
) -> Result<RequestDescriptor<SearchResults>, ApiError> {
    let base = base_url.trim_end_matches('/');
    RequestDescriptor::new(HttpMethod::Get, &format!("{base}/search/repositories?q={query}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_ITEMS: &str = r#"{
        "total_count": 2,
        "incomplete_results": false,
        "items": [
            {"name": "a", "html_url": "http://x"},
            {"name": "b", "html_url": "http://y"}
        ]
    }"#;

    #[test]
    fn decodes_wire_format() {
        let results: SearchResults = serde_json::from_str(TWO_ITEMS).unwrap();
        assert_eq!(results.total_count, 2);
        assert!(!results.incomplete_results);
        let items = results.items.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "a");
        assert_eq!(items[0].html_url, "http://x");
        assert_eq!(items[1].name, "b");
        assert_eq!(items[1].html_url, "http://y");
    }

    #[test]
    fn decode_assigns_fresh_ids_every_time() {
        let first: SearchResults = serde_json::from_str(TWO_ITEMS).unwrap();
        let second: SearchResults = serde_json::from_str(TWO_ITEMS).unwrap();
        let first = first.items.unwrap();
        let second = second.items.unwrap();
        assert_ne!(first[0].id, first[1].id);
        assert_ne!(first[0].id, second[0].id);
    }

    #[test]
    fn id_never_serializes_to_the_wire() {
        let results: SearchResults = serde_json::from_str(TWO_ITEMS).unwrap();
        let json = serde_json::to_value(&results).unwrap();
        assert!(json["items"][0].get("id").is_none());
        assert_eq!(json["items"][0]["name"], "a");
    }

    #[test]
    fn null_items_decode_to_none() {
        let results: SearchResults =
            serde_json::from_str(r#"{"total_count":0,"incomplete_results":false,"items":null}"#)
                .unwrap();
        assert!(results.items.is_none());
    }

    #[test]
    fn absent_items_decode_to_none() {
        let results: SearchResults =
            serde_json::from_str(r#"{"total_count":0,"incomplete_results":false}"#).unwrap();
        assert!(results.items.is_none());
    }

    #[test]
    fn search_descriptor_targets_the_search_endpoint() {
        let descriptor = search_repositories("https://api.github.com", "rust+http").unwrap();
        assert_eq!(descriptor.method(), &HttpMethod::Get);
        assert_eq!(
            descriptor.url(),
            "https://api.github.com/search/repositories?q=rust+http"
        );
        assert!(descriptor.headers().is_empty());
        assert!(descriptor.body().is_none());
    }

    #[test]
    fn search_descriptor_tolerates_trailing_slash() {
        let descriptor = search_repositories("http://localhost:3000/", "rust+http").unwrap();
        assert_eq!(
            descriptor.url(),
            "http://localhost:3000/search/repositories?q=rust+http"
        );
    }

    #[test]
    fn search_descriptor_rejects_bad_base_url() {
        let err = search_repositories("not a url", "rust+http").unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }
}
