//! product_search tool implementation.
//!
//! Runs a shopping search and makes the results the session's current list.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use hollow_core::{Error, SearchResult};

use crate::handoff::SearchSession;
use crate::state::AppState;

/// Input parameters for product_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ProductSearchParams {
    /// Free-text product query.
    pub query: String,
}

/// Output structure for product_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProductSearchOutput {
    pub query: String,
    /// False when a newer search replaced this one before it finished.
    pub current: bool,
    pub count: usize,
    /// Results in display order; pass an index to `product_resolve`.
    pub results: Vec<SearchResult>,
}

/// Implementation of the product_search tool.
pub async fn search_impl(
    state: &AppState, session: &Mutex<SearchSession>, params: ProductSearchParams,
) -> Result<CallToolResult, McpError> {
    let token = session.lock().await.begin_search();
    let results = state.dispatcher.search(&params.query).await;
    let current = session.lock().await.complete_search(token, results.clone());

    let output = ProductSearchOutput { query: params.query, current, count: results.len(), results };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize results: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
