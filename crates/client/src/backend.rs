//! Shopping search backend port.

use async_trait::async_trait;
use hollow_core::DetailRecord;

use crate::serpapi::{SearchRequest, SearchResponse, ShoppingError};

/// Upstream shopping API as seen by the handoff components.
///
/// Implemented by [`crate::ShoppingClient`]; tests substitute fakes.
#[async_trait]
pub trait ShoppingBackend: Send + Sync {
    /// Run a product search.
    async fn search(&self, req: &SearchRequest) -> Result<SearchResponse, ShoppingError>;

    /// Fetch the extended detail document behind a result's detail reference.
    async fn fetch_detail(&self, reference: &str) -> Result<DetailRecord, ShoppingError>;
}
