//! product_resolve tool implementation.
//!
//! Loads and caches the details for one result of the current list and
//! returns the page URL once the record is stored.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use hollow_core::Error;

use crate::handoff::SearchSession;
use crate::state::AppState;

/// Input parameters for product_resolve tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProductResolveParams {
    /// Zero-based index into the results of the last `product_search`.
    pub index: usize,
}

/// Output structure for product_resolve tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProductResolveOutput {
    pub key: String,
    pub product_id: String,
    /// Absolute URL of the product page.
    pub url: String,
    pub written_at: String,
}

/// Implementation of the product_resolve tool.
pub async fn resolve_impl(
    state: &AppState, session: &Mutex<SearchSession>, params: ProductResolveParams,
) -> Result<CallToolResult, McpError> {
    let selected = {
        let mut session = session.lock().await;
        let selected = session
            .select(params.index)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "no result at index {} (current list has {})",
                    params.index,
                    session.results().len()
                ))
            })?;
        session.begin_resolve();
        selected
    };

    let outcome = state.resolver.resolve(&selected).await;
    session.lock().await.finish_resolve(outcome.is_ok());
    let nav = outcome?;

    let output = ProductResolveOutput {
        url: state.config.product_url(&nav.location),
        key: nav.key,
        product_id: nav.product_id,
        written_at: nav.written_at,
    };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize navigation: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
