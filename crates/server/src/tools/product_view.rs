//! product_view tool implementation.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use hollow_core::{Error, product_key};

use crate::handoff::SearchSession;
use crate::state::AppState;

/// Input parameters for product_view tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProductViewParams {
    /// Product id returned by `product_resolve`.
    pub product_id: String,
}

/// Implementation of the product_view tool.
///
/// Returns the merged record with its detail sections, or NOT_FOUND.
pub async fn view_impl(
    state: &AppState, session: &Mutex<SearchSession>, params: ProductViewParams,
) -> Result<CallToolResult, McpError> {
    let view = state.viewer.view(&params.product_id).await?;
    session.lock().await.record_view(view.is_some());

    let view = view.ok_or_else(|| Error::NotFound(product_key(&params.product_id)))?;
    let json = serde_json::to_string_pretty(&view)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize product: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, result, test_state};
    use serde_json::Value;

    #[tokio::test]
    async fn test_view_resolved_product() {
        let (state, _store) = test_state(FakeBackend::default()).await;
        state.resolver.resolve(&result("A2")).await.unwrap();
        let session = Mutex::new(SearchSession::new());

        let result = view_impl(&state, &session, ProductViewParams { product_id: "A2".into() }).await.unwrap();
        let text = result.content.first().and_then(|c| c.as_text()).unwrap();
        let json: Value = serde_json::from_str(&text.text).unwrap();

        assert_eq!(json["product"]["product_id"], "A2");
        assert_eq!(json["sections"]["sellers"][0]["name"], "Shop A2");
    }

    #[tokio::test]
    async fn test_view_missing_product() {
        let (state, _store) = test_state(FakeBackend::default()).await;
        let session = Mutex::new(SearchSession::new());

        let result = view_impl(&state, &session, ProductViewParams { product_id: "A9".into() }).await;
        assert_eq!(result.unwrap_err().code.0, -32001);
    }
}
