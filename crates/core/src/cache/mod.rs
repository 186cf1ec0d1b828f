//! Key-value cache for merged product records.
//!
//! The handoff between the resolver and the detail page goes through a
//! [`KvStore`]: the resolver writes a [`CachedProduct`] under a key derived
//! from the product id, the viewer reads it back. [`CacheDb`] is the
//! persistent implementation:
//!
//! - SQLite with async access via tokio-rusqlite
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Single-statement UPSERT writes (no partial overwrites)

pub mod connection;
pub mod entries;
pub mod key;
pub mod migrations;

pub use crate::Error;

pub use connection::CacheDb;
pub use key::{KEY_PREFIX, product_key, validate_product_id};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::CachedProduct;

/// Acknowledgment that a write has been committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub key: String,
    /// RFC 3339 commit timestamp.
    pub written_at: String,
}

/// Minimal string key-value store shared by the resolver and the viewer.
///
/// `set` must not return until the value is durable: a `get` issued after
/// `set` resolves observes the new value.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    async fn set(&self, key: &str, value: &str) -> Result<Ack, Error>;
}

/// Check that a merged product is fit to cache: it needs an id to key it
/// by and a non-empty detail record for the page to show.
pub fn validate_product(product: &CachedProduct) -> Result<(), Error> {
    validate_product_id(product.product_id())?;
    if product.serpapi_data.is_empty() {
        return Err(Error::MalformedData(format!("product {} has no detail record", product.product_id())));
    }
    Ok(())
}

/// Serialize and write a merged product under its own key.
pub async fn store_product(store: &dyn KvStore, product: &CachedProduct) -> Result<Ack, Error> {
    validate_product(product)?;
    let json = serde_json::to_string(product)?;
    store.set(&product.key(), &json).await
}

/// Read and decode a merged product.
///
/// Returns `Ok(None)` when the key was never written.
pub async fn load_product(store: &dyn KvStore, key: &str) -> Result<Option<CachedProduct>, Error> {
    match store.get(key).await? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}
