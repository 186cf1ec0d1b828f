//! Core types and shared functionality for hollow.
//!
//! This crate provides:
//! - Product data model (search results, detail documents, cached products)
//! - Key-value cache with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod model;

pub use cache::{Ack, CacheDb, KvStore, product_key};
pub use config::{AppConfig, ConfigError, Transport};
pub use error::Error;
pub use model::{AlternativePrice, CachedProduct, DetailRecord, SearchResult, merge};
