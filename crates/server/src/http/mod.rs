//! HTTP transport: JSON API plus server-rendered pages.

pub mod api;
pub mod pages;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/product/{id}", get(pages::product))
        .route("/api/search", get(api::search))
        .route("/api/fetchDetails", post(api::fetch_details))
        .route("/api/set", post(api::set))
        .route("/api/resolve", post(api::resolve))
        .route("/api/product/{id}", get(api::product))
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Starting hollow server on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("shutting down");
}
