//! Shopping search result records.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Secondary (usually pre-discount) price shown next to the main price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AlternativePrice {
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_price: Option<f64>,
}

/// One item of a shopping search.
///
/// Field names follow the upstream `shopping_results` entries so a result
/// can be round-tripped through the cache without renaming. Every field is
/// optional on the wire; absent values deserialize to their defaults, and
/// scalar fields tolerate nulls and stringly-typed numbers such as `"1.2K"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SearchResult {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::position")]
    pub position: Option<u32>,
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    /// Display price, e.g. `"$49.99"`.
    #[serde(deserialize_with = "lenient::text")]
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::number")]
    pub extracted_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_price: Option<AlternativePrice>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::number")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::count")]
    pub reviews: Option<u64>,
    /// Stable upstream identifier; the cache key derives from it.
    #[serde(deserialize_with = "lenient::text")]
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serpapi_product_api: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub immersive_product_page_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serpapi_immersive_product_api: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_icon: Option<String>,
    #[serde(deserialize_with = "lenient::flag")]
    pub multiple_sources: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "lenient::strings")]
    pub extensions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "lenient::strings")]
    pub thumbnails: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "lenient::strings")]
    pub serpapi_thumbnails: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl SearchResult {
    /// Reference used to fetch the detail record.
    ///
    /// Prefers the product API link and falls back to the immersive one.
    pub fn detail_reference(&self) -> Option<&str> {
        [self.serpapi_product_api.as_deref(), self.serpapi_immersive_product_api.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}

/// Field decoders that degrade to the default instead of failing the record.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        })
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().replace(',', "").parse().ok(),
            _ => None,
        })
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)),
            Value::String(s) => parse_count(&s),
            _ => None,
        })
    }

    pub fn position<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        Ok(count(d)?.and_then(|n| u32::try_from(n).ok()))
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(matches!(Value::deserialize(d)?, Value::Bool(true)))
    }

    pub fn strings<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => items.into_iter().filter_map(|v| v.as_str().map(str::to_string)).collect(),
            _ => Vec::new(),
        })
    }

    /// Parses counts like `"87"`, `"3,400"` or `"1.2K"`.
    pub(super) fn parse_count(raw: &str) -> Option<u64> {
        let cleaned = raw.trim().replace(',', "");
        let (digits, scale) = match cleaned.chars().last()? {
            'k' | 'K' => (&cleaned[..cleaned.len() - 1], 1_000.0),
            'm' | 'M' => (&cleaned[..cleaned.len() - 1], 1_000_000.0),
            _ => (cleaned.as_str(), 1.0),
        };
        let n: f64 = digits.trim().parse().ok()?;
        (n.is_finite() && n >= 0.0).then(|| (n * scale).round() as u64)
    }
}
