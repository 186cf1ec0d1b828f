//! Shopping search response types and normalization.

use hollow_core::SearchResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

/// Notice the API returns (as an `error`) when a query simply has no hits.
const NO_RESULTS_NOTICE: &str = "hasn't returned any results";

/// Raw response from the `google_shopping` engine.
#[derive(Debug, Deserialize)]
pub struct ShoppingApiResponse {
    #[serde(default)]
    pub search_metadata: Option<SearchMetadata>,
    #[serde(default)]
    pub search_parameters: Option<SearchParameters>,
    /// Kept raw so one malformed entry cannot fail the whole page.
    #[serde(default)]
    pub shopping_results: Vec<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Request bookkeeping attached by the API.
#[derive(Debug, Deserialize)]
pub struct SearchMetadata {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Echo of the parameters the API actually used.
#[derive(Debug, Deserialize)]
pub struct SearchParameters {
    #[serde(default)]
    pub q: Option<String>,
}

impl ShoppingApiResponse {
    /// Upstream error that is not just a "no results" notice.
    pub fn failure(&self) -> Option<&str> {
        self.error.as_deref().filter(|msg| !msg.contains(NO_RESULTS_NOTICE))
    }
}

/// Decode each raw entry on its own, dropping the ones that do not decode.
fn decode_results(raw: Vec<Value>) -> Vec<SearchResult> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping undecodable shopping result");
                None
            }
        })
        .collect()
}

/// Normalized search response for internal use.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub query: String,
    pub debug: DebugInfo,
}

/// Debug information for the search.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DebugInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
}

impl From<ShoppingApiResponse> for SearchResponse {
    /// Convert a raw API response to the normalized internal format.
    fn from(raw: ShoppingApiResponse) -> Self {
        SearchResponse {
            results: decode_results(raw.shopping_results),
            query: raw.search_parameters.and_then(|p| p.q).unwrap_or_default(),
            debug: DebugInfo { request_id: raw.search_metadata.and_then(|m| m.id), elapsed_ms: None },
        }
    }
}

impl SearchResponse {
    /// Record how long the round trip took.
    pub fn with_timing(mut self, start: Instant) -> Self {
        self.debug.elapsed_ms = Some(start.elapsed().as_millis() as u64);
        self
    }

    /// Get the number of results.
    pub fn result_count(&self) -> usize {
        self.results.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_JSON: &str = r#"{
        "search_metadata": {"id": "abc123", "status": "Success"},
        "search_parameters": {"engine": "google_shopping", "q": "red shoes"},
        "shopping_results": [
            {
                "position": 1,
                "title": "Red Shoe One",
                "price": "$40.00",
                "extracted_price": 40.0,
                "product_id": "A1",
                "serpapi_product_api": "https://serpapi.com/search.json?engine=google_product&product_id=A1",
                "source": "Store One"
            },
            {
                "position": 2,
                "title": "Red Shoe Two",
                "price": "$55.00",
                "extracted_price": 55.0,
                "product_id": "A2",
                "serpapi_product_api": "https://serpapi.com/search.json?engine=google_product&product_id=A2",
                "source": "Store Two",
                "rating": 4.2,
                "reviews": 87
            }
        ]
    }"#;

    #[test]
    fn test_normalize_to_search_response() {
        let raw: ShoppingApiResponse = serde_json::from_str(FIXTURE_JSON).unwrap();
        assert!(raw.failure().is_none());

        let normalized: SearchResponse = raw.into();
        assert_eq!(normalized.query, "red shoes");
        assert_eq!(normalized.result_count(), 2);
        assert_eq!(normalized.results[1].product_id, "A2");
        assert_eq!(normalized.results[1].reviews, Some(87));
        assert_eq!(normalized.debug.request_id.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_no_results_notice_is_not_a_failure() {
        let raw: ShoppingApiResponse =
            serde_json::from_str(r#"{"error": "Google Shopping hasn't returned any results for this query."}"#).unwrap();
        assert!(raw.failure().is_none());
        let normalized: SearchResponse = raw.into();
        assert_eq!(normalized.result_count(), 0);
    }

    #[test]
    fn test_error_field_is_failure() {
        let raw: ShoppingApiResponse = serde_json::from_str(r#"{"error": "Invalid API key."}"#).unwrap();
        assert_eq!(raw.failure(), Some("Invalid API key."));
    }

    #[test]
    fn test_bad_entry_is_skipped() {
        let json = r#"{
            "shopping_results": [
                {"title": "Good One", "product_id": "A1", "reviews": 12},
                "not an object",
                {"title": "Odd Price", "product_id": "A3", "alternative_price": 19.99},
                {"title": null, "product_id": "A4", "reviews": "1.2K"},
                {"title": "Good Two", "product_id": "A5"}
            ]
        }"#;

        let raw: ShoppingApiResponse = serde_json::from_str(json).unwrap();
        let normalized: SearchResponse = raw.into();

        let ids: Vec<&str> = normalized.results.iter().map(|r| r.product_id.as_str()).collect();
        assert_eq!(ids, vec!["A1", "A4", "A5"]);
        assert!(normalized.results[1].title.is_empty());
        assert_eq!(normalized.results[1].reviews, Some(1200));
    }
}
