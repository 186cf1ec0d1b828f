//! Detail view: read a merged product back by id.

use std::sync::Arc;

use hollow_core::cache::{load_product, validate_product_id};
use hollow_core::model::DetailSections;
use hollow_core::{CachedProduct, Error, KvStore, product_key};
use schemars::JsonSchema;
use serde::Serialize;

/// A cached product plus its detail record projected into page sections.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ProductView {
    pub product: CachedProduct,
    pub sections: DetailSections,
}

impl From<CachedProduct> for ProductView {
    fn from(product: CachedProduct) -> Self {
        let sections = product.serpapi_data.sections();
        Self { product, sections }
    }
}

/// Reads the record the resolver wrote. Never writes.
pub struct DetailViewer {
    store: Arc<dyn KvStore>,
}

impl DetailViewer {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Look up a product page by product id.
    ///
    /// `Ok(None)` is the not-found state: the id is unusable, nothing was
    /// cached under it, or the stored record no longer decodes.
    pub async fn view(&self, product_id: &str) -> Result<Option<ProductView>, Error> {
        if let Err(e) = validate_product_id(product_id) {
            tracing::debug!(product_id, error = %e, "rejecting product id");
            return Ok(None);
        }
        self.view_key(&product_key(product_id)).await
    }

    /// Look up a product page by cache key.
    pub async fn view_key(&self, key: &str) -> Result<Option<ProductView>, Error> {
        match load_product(self.store.as_ref(), key).await {
            Ok(Some(product)) => Ok(Some(product.into())),
            Ok(None) => {
                tracing::debug!(key, "no cached product");
                Ok(None)
            }
            Err(Error::MalformedData(msg)) => {
                tracing::warn!(key, error = %msg, "cached product is unreadable, treating as missing");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handoff::{DetailResolver, QueryDispatcher};
    use crate::testing::{FakeBackend, detail, result};
    use hollow_core::{AppConfig, CacheDb};

    async fn setup() -> (Arc<CacheDb>, DetailResolver, DetailViewer) {
        let store = Arc::new(CacheDb::open_in_memory().await.unwrap());
        let backend = Arc::new(FakeBackend::with_results(vec![result("A1"), result("A2")]));
        let resolver = DetailResolver::new(backend, store.clone());
        let viewer = DetailViewer::new(store.clone());
        (store, resolver, viewer)
    }

    #[tokio::test]
    async fn test_view_after_resolve() {
        let (_store, resolver, viewer) = setup().await;
        let nav = resolver.resolve(&result("A2")).await.unwrap();

        let view = viewer.view(&nav.product_id).await.unwrap().unwrap();
        assert_eq!(view.product.summary, result("A2"));
        assert_eq!(view.product.serpapi_data, detail("A2"));
        assert_eq!(view.sections.sellers.len(), 1);
        assert_eq!(view.sections.reviews.len(), 1);
    }

    #[tokio::test]
    async fn test_view_missing_product() {
        let (_store, _resolver, viewer) = setup().await;
        assert!(viewer.view("never").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_view_invalid_id_is_not_found() {
        let (_store, _resolver, viewer) = setup().await;
        assert!(viewer.view("").await.unwrap().is_none());
        assert!(viewer.view("../etc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_view_is_repeatable() {
        let (_store, resolver, viewer) = setup().await;
        resolver.resolve(&result("A1")).await.unwrap();

        let first = viewer.view("A1").await.unwrap();
        let second = viewer.view("A1").await.unwrap();
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_search_select_view_flow() {
        let (_store, resolver, viewer) = setup().await;
        let dispatcher = QueryDispatcher::new(
            Arc::new(FakeBackend::with_results(vec![result("A1"), result("A2")])),
            &AppConfig::default(),
        );

        let results = dispatcher.search("red shoes").await;
        let nav = resolver.resolve(&results[1]).await.unwrap();
        assert_eq!(nav.key, "product:A2");
        assert_eq!(nav.location, "/product/A2");

        let a2 = viewer.view("A2").await.unwrap().unwrap();
        assert!(!a2.sections.sellers.is_empty());
        assert!(!a2.sections.reviews.is_empty());

        resolver.resolve(&results[0]).await.unwrap();
        assert_eq!(viewer.view("A2").await.unwrap().unwrap(), a2);
    }

    #[tokio::test]
    async fn test_corrupt_record_is_not_found() {
        let (store, _resolver, viewer) = setup().await;
        store.set("product:bad", "{not json").await.unwrap();
        assert!(viewer.view("bad").await.unwrap().is_none());
    }
}
