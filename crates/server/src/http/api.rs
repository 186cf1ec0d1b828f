//! JSON API handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use hollow_core::{CachedProduct, DetailRecord, Error, SearchResult, product_key};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::handoff::Navigation;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchBody {
    pub results: Vec<SearchResult>,
}

/// `GET /api/search?q=`: always succeeds; failures yield no results.
pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchBody> {
    let results = state.dispatcher.search(&params.q).await;
    Json(SearchBody { results })
}

#[derive(Debug, Deserialize)]
pub struct FetchDetailsBody {
    pub url: String,
}

/// `POST /api/fetchDetails`: raw detail record for a detail reference.
pub async fn fetch_details(
    State(state): State<AppState>, Json(body): Json<FetchDetailsBody>,
) -> Result<Json<DetailRecord>, ApiError> {
    let detail = state.backend.fetch_detail(&body.url).await?;
    if detail.is_empty() {
        return Err(Error::MalformedData("empty detail record".into()).into());
    }
    Ok(Json(detail))
}

#[derive(Debug, Deserialize)]
pub struct SetBody {
    pub product: CachedProduct,
}

#[derive(Debug, Serialize)]
pub struct SetResponse {
    pub ok: bool,
    pub key: String,
    pub written_at: String,
}

/// `POST /api/set`: write a merged product; responds once it is durable.
pub async fn set(State(state): State<AppState>, Json(body): Json<SetBody>) -> Result<Json<SetResponse>, ApiError> {
    let ack = state.resolver.write(&body.product).await?;
    Ok(Json(SetResponse { ok: true, key: ack.key, written_at: ack.written_at }))
}

#[derive(Debug, Deserialize)]
pub struct ResolveBody {
    pub product: SearchResult,
}

/// `POST /api/resolve`: fetch, merge and write in one call.
pub async fn resolve(
    State(state): State<AppState>, Json(body): Json<ResolveBody>,
) -> Result<Json<Navigation>, ApiError> {
    Ok(Json(state.resolver.resolve(&body.product).await?))
}

/// `GET /api/product/{id}`: the cached record as stored.
pub async fn product(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<CachedProduct>, ApiError> {
    match state.viewer.view(&id).await? {
        Some(view) => Ok(Json(view.product)),
        None => Err(Error::NotFound(product_key(&id)).into()),
    }
}
