//! Merged product records as persisted in the cache.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{DetailRecord, SearchResult};
use crate::cache::product_key;

/// A search result merged with its detail record.
///
/// Serializes as the search result's fields at top level plus the detail
/// document under `serpapi_data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CachedProduct {
    #[serde(flatten)]
    pub summary: SearchResult,
    #[serde(default)]
    pub serpapi_data: DetailRecord,
}

impl CachedProduct {
    /// Cache key this record is stored under.
    pub fn key(&self) -> String {
        product_key(&self.summary.product_id)
    }

    pub fn product_id(&self) -> &str {
        &self.summary.product_id
    }
}

/// Combine a selected result with its fetched detail record.
pub fn merge(selected: &SearchResult, detail: DetailRecord) -> CachedProduct {
    CachedProduct { summary: selected.clone(), serpapi_data: detail }
}
