//! Product data model.
//!
//! A [`SearchResult`] is what the shopping search returns, a [`DetailRecord`]
//! is the opaque per-product document, and a [`CachedProduct`] is the two
//! merged under one cache key.

pub mod detail;
pub mod product;
pub mod search;

pub use detail::{DetailRecord, DetailSections, RatingBucket, RelatedProduct, Review, ReviewFilter, SellerOffer};
pub use product::{CachedProduct, merge};
pub use search::{AlternativePrice, SearchResult};
