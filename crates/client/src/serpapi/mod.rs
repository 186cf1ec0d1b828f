//! SerpApi shopping client.
//!
//! Provides a client for Google Shopping search and Google Product detail
//! lookups through SerpApi, with rate limiting, request validation, and
//! response normalization.
//!
//! ### Specification
//!
//! - **Search endpoint**: `{base}/search.json?engine=google_shopping`
//! - **Detail endpoint**: the `serpapi_product_api` URL carried by each result
//! - **Authentication**: `api_key` query parameter.
//! - **Rate Limiting**: minimum interval between requests (token bucket of one).
//! - **Normalization**: `shopping_results` become [`hollow_core::SearchResult`];
//!   detail documents are kept opaque as [`hollow_core::DetailRecord`].

pub mod error;
pub mod reference;
pub mod request;
pub mod response;

pub use error::ShoppingError;
pub use reference::resolve_reference;
pub use request::SearchRequest;
pub use response::{DebugInfo, SearchResponse, ShoppingApiResponse};

use async_trait::async_trait;
use hollow_core::{AppConfig, DetailRecord};
use reqwest::{StatusCode, header};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use url::Url;

use crate::backend::ShoppingBackend;

/// Default base URL for SerpApi.
const DEFAULT_BASE_URL: &str = "https://serpapi.com";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "hollow/0.1";

/// Default minimum interval between requests.
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(200);

/// Search engine name for product listings.
const SEARCH_ENGINE: &str = "google_shopping";

/// SerpApi client configuration.
#[derive(Debug, Clone)]
pub struct ShoppingConfig {
    /// API key. May be empty; calls then fail with `MissingApiKey`.
    pub api_key: String,
    /// Base URL (default: https://serpapi.com).
    pub base_url: String,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string (default: hollow/0.x).
    pub user_agent: String,
    /// Minimum spacing between requests (default: 200ms).
    pub min_interval: Duration,
}

impl Default for ShoppingConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            min_interval: DEFAULT_MIN_INTERVAL,
        }
    }
}

impl From<&AppConfig> for ShoppingConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_key: config.serpapi_api_key.clone().unwrap_or_default(),
            base_url: config.serpapi_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            ..Default::default()
        }
    }
}

/// Rate limiter to enforce request intervals.
#[derive(Debug)]
struct RateLimiter {
    last_request: Mutex<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(Instant::now().checked_sub(min_interval).unwrap_or_else(Instant::now)),
            min_interval,
        }
    }

    /// Acquire permission to make a request, waiting if necessary.
    async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < self.min_interval {
            tokio::time::sleep(self.min_interval - elapsed).await;
        }
        *last = Instant::now();
    }
}

/// SerpApi shopping client.
#[derive(Debug, Clone)]
pub struct ShoppingClient {
    http: reqwest::Client,
    base: Url,
    config: ShoppingConfig,
    rate_limiter: Arc<RateLimiter>,
}

impl ShoppingClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ShoppingConfig) -> Result<Self, ShoppingError> {
        let base = Url::parse(&config.base_url).map_err(|e| ShoppingError::InvalidReference(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| ShoppingError::Network(Arc::new(e)))?;

        let rate_limiter = Arc::new(RateLimiter::new(config.min_interval));

        Ok(Self { http, base, config, rate_limiter })
    }

    fn api_key(&self) -> Result<&str, ShoppingError> {
        if self.config.api_key.is_empty() { Err(ShoppingError::MissingApiKey) } else { Ok(&self.config.api_key) }
    }

    /// Execute a shopping search.
    ///
    /// This method handles rate limiting and response normalization.
    pub async fn search(&self, req: &SearchRequest) -> Result<SearchResponse, ShoppingError> {
        let api_key = self.api_key()?;

        self.rate_limiter.acquire().await;

        let start = Instant::now();
        let url = self
            .base
            .join("search.json")
            .map_err(|e| ShoppingError::InvalidReference(e.to_string()))?;

        tracing::debug!(query = %req.q, "searching shopping API");

        let http_response = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/json")
            .query(&[("engine", SEARCH_ENGINE), ("api_key", api_key)])
            .query(req)
            .send()
            .await?;

        let bytes = Self::check_status(http_response).await?;
        let api_response: ShoppingApiResponse =
            serde_json::from_slice(&bytes).map_err(|e| ShoppingError::Parse(e.to_string()))?;

        if let Some(message) = api_response.failure() {
            return Err(ShoppingError::Upstream(message.to_string()));
        }

        let mut response = SearchResponse::from(api_response).with_timing(start);
        if response.query.is_empty() {
            response.query = req.q.clone();
        }

        tracing::debug!(
            elapsed_ms = response.debug.elapsed_ms,
            results = response.result_count(),
            "search completed"
        );

        Ok(response)
    }

    /// Fetch the detail document behind a result's detail reference.
    ///
    /// The reference must point at the configured API host. Empty documents
    /// and documents carrying an `error` field are failures.
    pub async fn fetch_detail(&self, reference: &str) -> Result<DetailRecord, ShoppingError> {
        let api_key = self.api_key()?;
        let url = resolve_reference(&self.base, reference, api_key)?;

        self.rate_limiter.acquire().await;

        let start = Instant::now();
        tracing::debug!(path = url.path(), "fetching product detail");

        let http_response = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let bytes = Self::check_status(http_response).await?;
        let detail: DetailRecord = serde_json::from_slice(&bytes).map_err(|e| ShoppingError::Parse(e.to_string()))?;

        if let Some(message) = detail.error_message() {
            return Err(ShoppingError::Upstream(message.to_string()));
        }
        if detail.is_empty() {
            return Err(ShoppingError::EmptyDetail);
        }

        tracing::debug!(elapsed_ms = start.elapsed().as_millis() as u64, "detail fetched");

        Ok(detail)
    }

    /// Map non-success statuses to errors and read the body.
    async fn check_status(response: reqwest::Response) -> Result<bytes::Bytes, ShoppingError> {
        let status = response.status();
        tracing::debug!("shopping API response status: {}", status);

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ShoppingError::AuthError);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ShoppingError::RateLimited);
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(ShoppingError::HttpError { status: status.as_u16() });
        }

        Ok(response.bytes().await?)
    }
}

#[async_trait]
impl ShoppingBackend for ShoppingClient {
    async fn search(&self, req: &SearchRequest) -> Result<SearchResponse, ShoppingError> {
        ShoppingClient::search(self, req).await
    }

    async fn fetch_detail(&self, reference: &str) -> Result<DetailRecord, ShoppingError> {
        ShoppingClient::fetch_detail(self, reference).await
    }
}
