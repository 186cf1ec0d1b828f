//! Client code for hollow.
//!
//! This crate provides the SerpApi shopping client used for product search
//! and product detail lookups, and the [`ShoppingBackend`] seam the server's
//! handoff components are written against.

pub mod backend;
pub mod serpapi;

pub use backend::ShoppingBackend;
pub use serpapi::{
    DebugInfo, SearchRequest, SearchResponse, ShoppingClient, ShoppingConfig, ShoppingError, resolve_reference,
};
