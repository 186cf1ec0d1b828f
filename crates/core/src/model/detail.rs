//! Opaque product detail documents.
//!
//! The detail endpoint returns a deeply nested JSON document whose shape is
//! owned upstream. It is stored as-is; the accessors here walk it by path and
//! yield nothing (rather than failing) when a path is missing or has the
//! wrong type.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const SELLERS: &[&str] = &["sellers_results", "online_sellers"];
const RELATED: &[&str] = &["related_products", "different_brand"];
const SPECS: &[&str] = &["specs_results", "details"];
const RATINGS: &[&str] = &["reviews_results", "ratings"];
const FILTERS: &[&str] = &["reviews_results", "filters"];
const REVIEWS: &[&str] = &["reviews_results", "reviews"];

/// Extended per-product document, passed through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct DetailRecord(Value);

/// One merchant offering the product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SellerOffer {
    pub name: String,
    pub price: Option<String>,
    pub link: Option<String>,
}

/// A product from a different brand shown alongside this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RelatedProduct {
    pub title: String,
    pub link: Option<String>,
}

/// Count of reviews at one star level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RatingBucket {
    pub stars: String,
    pub count: u64,
}

/// Review topic filter with its hit count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReviewFilter {
    pub name: String,
    pub count: Option<u64>,
}

/// A single free-text review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Review {
    pub title: Option<String>,
    pub content: String,
    pub rating: Option<f64>,
}

/// All projected sections of a detail record. Missing sections are empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetailSections {
    pub sellers: Vec<SellerOffer>,
    pub related: Vec<RelatedProduct>,
    pub specs: Vec<String>,
    pub ratings: Vec<RatingBucket>,
    pub filters: Vec<ReviewFilter>,
    pub reviews: Vec<Review>,
}

impl DetailRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// True for `null`, `{}` and `[]`.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Upstream-reported failure carried inside an otherwise successful response.
    pub fn error_message(&self) -> Option<&str> {
        self.0.get("error").and_then(Value::as_str)
    }

    /// Walk nested objects by key.
    pub fn at(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(&self.0, |node, key| node.get(key))
    }

    /// Array at `path`, or an empty slice when absent or not an array.
    pub fn array_at(&self, path: &[&str]) -> &[Value] {
        self.at(path).and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn sellers(&self) -> Vec<SellerOffer> {
        self.array_at(SELLERS)
            .iter()
            .filter_map(|seller| {
                Some(SellerOffer {
                    name: text(seller, &["name"])?,
                    price: seller
                        .get("price")
                        .and_then(|p| text(p, &["extracted"]))
                        .or_else(|| text(seller, &["base_price", "total_price"])),
                    link: text(seller, &["link", "direct_link"]),
                })
            })
            .collect()
    }

    pub fn related(&self) -> Vec<RelatedProduct> {
        self.array_at(RELATED)
            .iter()
            .filter_map(|item| Some(RelatedProduct { title: text(item, &["title"])?, link: text(item, &["link"]) }))
            .collect()
    }

    /// Specification lines. Entries are either plain strings or
    /// `{name|title, value}` pairs.
    pub fn specs(&self) -> Vec<String> {
        self.array_at(SPECS)
            .iter()
            .filter_map(|spec| match spec {
                Value::String(line) => Some(line.clone()),
                Value::Object(_) => match (text(spec, &["name", "title"]), text(spec, &["value"])) {
                    (Some(name), Some(value)) => Some(format!("{name}: {value}")),
                    (Some(name), None) => Some(name),
                    (None, Some(value)) => Some(value),
                    (None, None) => None,
                },
                _ => None,
            })
            .collect()
    }

    pub fn ratings(&self) -> Vec<RatingBucket> {
        self.array_at(RATINGS)
            .iter()
            .filter_map(|bucket| {
                Some(RatingBucket {
                    stars: text(bucket, &["rating", "stars"])?,
                    count: count(bucket, &["count", "amount"]).unwrap_or(0),
                })
            })
            .collect()
    }

    pub fn review_filters(&self) -> Vec<ReviewFilter> {
        self.array_at(FILTERS)
            .iter()
            .filter_map(|filter| {
                Some(ReviewFilter { name: text(filter, &["name", "label"])?, count: count(filter, &["count"]) })
            })
            .collect()
    }

    pub fn reviews(&self) -> Vec<Review> {
        self.array_at(REVIEWS)
            .iter()
            .filter_map(|review| {
                Some(Review {
                    title: text(review, &["title"]),
                    content: text(review, &["content", "snippet"])?,
                    rating: review.get("rating").and_then(Value::as_f64),
                })
            })
            .collect()
    }

    pub fn sections(&self) -> DetailSections {
        DetailSections {
            sellers: self.sellers(),
            related: self.related(),
            specs: self.specs(),
            ratings: self.ratings(),
            filters: self.review_filters(),
            reviews: self.reviews(),
        }
    }
}

impl From<Value> for DetailRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// First of `keys` holding a string or number, rendered as text.
fn text(node: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match node.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn count(node: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|key| node.get(key).and_then(Value::as_u64))
}
