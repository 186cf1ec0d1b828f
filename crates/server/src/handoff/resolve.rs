//! Detail resolution: fetch, merge, write, then navigate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use hollow_client::ShoppingBackend;
use hollow_core::cache::{store_product, validate_product, validate_product_id};
use hollow_core::{Ack, CachedProduct, Error, KvStore, SearchResult, merge};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex as AsyncMutex;

/// Where the detail view for a product lives.
pub fn product_location(product_id: &str) -> String {
    format!("/product/{}", product_id.trim())
}

/// Permission to open the detail view.
///
/// Only constructed after the merged record's write has been acknowledged,
/// so holding one means the viewer will find the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Navigation {
    pub key: String,
    pub product_id: String,
    /// Relative page address, e.g. `/product/A2`.
    pub location: String,
    pub written_at: String,
}

impl Navigation {
    fn after(ack: Ack, product_id: &str) -> Self {
        Self {
            key: ack.key,
            product_id: product_id.trim().to_string(),
            location: product_location(product_id),
            written_at: ack.written_at,
        }
    }
}

/// One async lock per cache key, so writes for the same product are
/// serialized while different products proceed in parallel.
#[derive(Default)]
struct KeyLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl KeyLocks {
    fn lock_for(&self, key: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(key.to_string()).or_default().clone()
    }
}

/// Turns a selected search result into a cached, viewable product.
pub struct DetailResolver {
    backend: Arc<dyn ShoppingBackend>,
    store: Arc<dyn KvStore>,
    locks: KeyLocks,
}

impl DetailResolver {
    pub fn new(backend: Arc<dyn ShoppingBackend>, store: Arc<dyn KvStore>) -> Self {
        Self { backend, store, locks: KeyLocks::default() }
    }

    /// Fetch the detail record for `selected`, merge it, and write it.
    ///
    /// Any failure aborts before navigation: nothing is written when the
    /// fetch fails, and no [`Navigation`] is produced when the write fails.
    pub async fn resolve(&self, selected: &SearchResult) -> Result<Navigation, Error> {
        validate_product_id(&selected.product_id)?;

        let reference = selected
            .detail_reference()
            .ok_or_else(|| Error::InvalidInput(format!("result {} has no detail reference", selected.product_id)))?;

        let detail = self.backend.fetch_detail(reference).await.map_err(|e| {
            tracing::warn!(product_id = %selected.product_id, error = %e, "detail fetch failed");
            Error::from(e)
        })?;

        if detail.is_empty() {
            return Err(Error::MalformedData(format!("empty detail record for {}", selected.product_id)));
        }

        let merged = merge(selected, detail);
        let key = merged.key();
        let lock = self.locks.lock_for(&key);
        let _guard = lock.lock().await;

        let ack = self.store_locked(&merged).await?;
        tracing::info!(key = %ack.key, "product cached, navigating");
        Ok(Navigation::after(ack, merged.product_id()))
    }

    /// Write an already merged product under its key.
    ///
    /// Products without an id or with an empty detail record are rejected
    /// before any lock is taken.
    pub async fn write(&self, product: &CachedProduct) -> Result<Ack, Error> {
        validate_product(product)?;
        let lock = self.locks.lock_for(&product.key());
        let _guard = lock.lock().await;
        self.store_locked(product).await
    }

    /// Caller holds the key's lock.
    async fn store_locked(&self, product: &CachedProduct) -> Result<Ack, Error> {
        store_product(self.store.as_ref(), product)
            .await
            .inspect_err(|e| tracing::error!(key = %product.key(), error = %e, "cache write failed"))
    }
}
