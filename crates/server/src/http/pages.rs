//! HTML page handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::render;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HomeParams {
    pub q: Option<String>,
}

/// `GET /`: search form, plus results when `q` is present.
pub async fn home(State(state): State<AppState>, Query(params): Query<HomeParams>) -> Html<String> {
    let results = match &params.q {
        Some(q) => state.dispatcher.search(q).await,
        None => Vec::new(),
    };
    Html(render::home(params.q.as_deref(), &results))
}

/// `GET /product/{id}`: detail page or the not-found page.
pub async fn product(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.viewer.view(&id).await {
        Ok(Some(view)) => Html(render::product(&view)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, Html(render::not_found(&id))).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}
