//! Fakes and fixtures shared by the server's unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hollow_client::{DebugInfo, SearchRequest, SearchResponse, ShoppingBackend, ShoppingError};
use hollow_core::{Ack, AppConfig, CacheDb, DetailRecord, Error, KvStore, SearchResult};
use serde_json::json;
use tokio::sync::Notify;

use crate::state::AppState;

pub fn result(id: &str) -> SearchResult {
    SearchResult {
        position: Some(1),
        title: format!("Product {id}"),
        price: "$10.00".into(),
        extracted_price: Some(10.0),
        product_id: id.into(),
        serpapi_product_api: Some(format!("https://serpapi.com/search.json?engine=google_product&product_id={id}")),
        source: "Test Store".into(),
        ..Default::default()
    }
}

pub fn detail(id: &str) -> DetailRecord {
    DetailRecord::new(json!({
        "product_results": {"title": format!("Product {id}")},
        "sellers_results": {
            "online_sellers": [{"name": format!("Shop {id}"), "price": {"extracted": 10.0}, "link": "https://shop.example/p"}]
        },
        "reviews_results": {
            "reviews": [{"title": "Good", "content": format!("Works for {id}"), "rating": 5.0}]
        }
    }))
}

/// Detail record whose every section names the revision it came from.
pub fn revised_detail(id: &str, revision: usize) -> DetailRecord {
    DetailRecord::new(json!({
        "product_results": {"title": format!("Product {id}"), "revision": revision},
        "sellers_results": {"online_sellers": [{"name": format!("Shop {id} r{revision}")}]},
        "reviews_results": {"reviews": [{"content": format!("Revision {revision}")}]}
    }))
}

/// Scripted shopping backend. Details are derived from the `product_id`
/// parameter of the reference.
#[derive(Default)]
pub struct FakeBackend {
    results: Vec<SearchResult>,
    search_fails: bool,
    detail_fails: bool,
    empty_detail: bool,
    versioned: bool,
    fetches: AtomicUsize,
    last_request: Mutex<Option<SearchRequest>>,
}

impl FakeBackend {
    pub fn with_results(results: Vec<SearchResult>) -> Self {
        Self { results, ..Default::default() }
    }

    pub fn failing_search() -> Self {
        Self { search_fails: true, ..Default::default() }
    }

    pub fn failing_detail() -> Self {
        Self { detail_fails: true, ..Default::default() }
    }

    pub fn with_empty_detail() -> Self {
        Self { empty_detail: true, ..Default::default() }
    }

    /// Every detail fetch returns a new revision of the record.
    pub fn with_versioned_detail() -> Self {
        Self { versioned: true, ..Default::default() }
    }

    pub fn last_request(&self) -> Option<SearchRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl ShoppingBackend for FakeBackend {
    async fn search(&self, req: &SearchRequest) -> Result<SearchResponse, ShoppingError> {
        *self.last_request.lock().unwrap() = Some(req.clone());
        if self.search_fails {
            return Err(ShoppingError::HttpError { status: 500 });
        }
        Ok(SearchResponse { results: self.results.clone(), query: req.q.clone(), debug: DebugInfo::default() })
    }

    async fn fetch_detail(&self, reference: &str) -> Result<DetailRecord, ShoppingError> {
        if self.detail_fails {
            return Err(ShoppingError::HttpError { status: 502 });
        }
        if self.empty_detail {
            return Ok(DetailRecord::default());
        }
        let id = reference
            .split_once("product_id=")
            .map(|(_, id)| id)
            .ok_or_else(|| ShoppingError::InvalidReference(reference.to_string()))?;
        if self.versioned {
            let revision = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
            return Ok(revised_detail(id, revision));
        }
        Ok(detail(id))
    }
}

/// Store whose writes block until released, to observe ordering.
pub struct GatedStore {
    inner: CacheDb,
    pub entered: Notify,
    pub release: Notify,
}

impl GatedStore {
    pub fn new(inner: CacheDb) -> Self {
        Self { inner, entered: Notify::new(), release: Notify::new() }
    }
}

#[async_trait]
impl KvStore for GatedStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<Ack, Error> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.set(key, value).await
    }
}

/// Store that remembers every committed write and its ack, in commit order.
pub struct RecordingStore {
    inner: CacheDb,
    writes: Mutex<Vec<(Ack, String)>>,
}

impl RecordingStore {
    pub fn new(inner: CacheDb) -> Self {
        Self { inner, writes: Mutex::new(Vec::new()) }
    }

    pub fn writes(&self) -> Vec<(Ack, String)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl KvStore for RecordingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<Ack, Error> {
        let ack = self.inner.set(key, value).await?;
        self.writes.lock().unwrap().push((ack.clone(), value.to_string()));
        Ok(ack)
    }
}

/// Store that rejects every write.
pub struct FailingStore;

#[async_trait]
impl KvStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, Error> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<Ack, Error> {
        Err(Error::Database(tokio_rusqlite::Error::ConnectionClosed))
    }
}

/// Application state over an in-memory cache.
pub async fn test_state(backend: FakeBackend) -> (AppState, Arc<CacheDb>) {
    let store = Arc::new(CacheDb::open_in_memory().await.unwrap());
    let state = AppState::new(AppConfig::default(), Arc::new(backend), store.clone());
    (state, store)
}
