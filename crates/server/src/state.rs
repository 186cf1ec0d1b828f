//! Shared application state.

use std::sync::Arc;

use hollow_client::ShoppingBackend;
use hollow_core::{AppConfig, KvStore};

use crate::handoff::{DetailResolver, DetailViewer, QueryDispatcher};

/// Everything a request handler needs, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: Arc<dyn ShoppingBackend>,
    pub dispatcher: Arc<QueryDispatcher>,
    pub resolver: Arc<DetailResolver>,
    pub viewer: Arc<DetailViewer>,
}

impl AppState {
    pub fn new(config: AppConfig, backend: Arc<dyn ShoppingBackend>, store: Arc<dyn KvStore>) -> Self {
        let dispatcher = Arc::new(QueryDispatcher::new(backend.clone(), &config));
        let resolver = Arc::new(DetailResolver::new(backend.clone(), store.clone()));
        let viewer = Arc::new(DetailViewer::new(store));

        Self { config: Arc::new(config), backend, dispatcher, resolver, viewer }
    }
}
