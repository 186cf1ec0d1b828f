//! hollow server entry point.
//!
//! Boots either the HTTP server (JSON API and product pages) or the MCP
//! server on stdio, depending on `HOLLOW_TRANSPORT`.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use hollow_client::{ShoppingClient, ShoppingConfig};
use hollow_core::{AppConfig, CacheDb, Transport};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod handoff;
mod http;
mod render;
mod state;
#[cfg(test)]
mod testing;
mod tools;

use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let store = Arc::new(CacheDb::open(&config.db_path).await?);
    let backend = Arc::new(ShoppingClient::new(ShoppingConfig::from(&config))?);
    let transport = config.transport;
    let state = AppState::new(config, backend, store);

    match transport {
        Transport::Http => http::serve(state).await?,
        Transport::Stdio => {
            tracing::info!("Starting hollow MCP server on stdio transport");
            let server = serve_server(handler::HollowMcpServer::new(state), stdio()).await?;
            server.waiting().await?;
        }
    }

    Ok(())
}
