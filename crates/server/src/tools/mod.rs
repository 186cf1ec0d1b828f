//! MCP tool implementations.
//!
//! This module contains all tools exposed by the hollow server.

pub mod product_resolve;
pub mod product_search;
pub mod product_view;

pub use product_resolve::ProductResolveParams;
pub use product_search::ProductSearchParams;
pub use product_view::ProductViewParams;
