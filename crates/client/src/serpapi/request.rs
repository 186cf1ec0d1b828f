//! Shopping search request types.

use serde::Serialize;

/// Search request parameters for the SerpApi `google_shopping` engine.
///
/// The query itself is passed through untouched: empty or whitespace
/// queries are valid and it is up to the API what they return.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct SearchRequest {
    /// Free-text query.
    pub q: String,

    /// Country code (e.g., "us").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gl: Option<String>,

    /// Interface language (e.g., "en").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hl: Option<String>,
}

impl SearchRequest {
    pub fn new(q: impl Into<String>) -> Self {
        Self { q: q.into(), ..Default::default() }
    }

    /// Attach country and language.
    pub fn localized(mut self, gl: &str, hl: &str) -> Self {
        self.gl = Some(gl.to_string());
        self.hl = Some(hl.to_string());
        self
    }
}
