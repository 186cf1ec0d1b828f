//! Query dispatch.

use std::sync::Arc;

use hollow_client::{SearchRequest, ShoppingBackend};
use hollow_core::{AppConfig, SearchResult};

/// Sends free-text queries to the shopping backend.
///
/// Failures are swallowed: a query that cannot be answered yields an empty
/// list and a warning in the log.
pub struct QueryDispatcher {
    backend: Arc<dyn ShoppingBackend>,
    country: String,
    language: String,
}

impl QueryDispatcher {
    pub fn new(backend: Arc<dyn ShoppingBackend>, config: &AppConfig) -> Self {
        Self { backend, country: config.country.clone(), language: config.language.clone() }
    }

    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        let req = SearchRequest::new(query).localized(&self.country, &self.language);

        match self.backend.search(&req).await {
            Ok(response) => {
                tracing::info!(query, results = response.result_count(), "search answered");
                response.results
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "search failed, showing no results");
                Vec::new()
            }
        }
    }
}
