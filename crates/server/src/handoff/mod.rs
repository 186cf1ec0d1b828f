//! The search → resolve → view handoff.
//!
//! - [`QueryDispatcher`] turns a query into a result list and never fails.
//! - [`DetailResolver`] fetches a selected result's detail record, merges
//!   and writes it, and only then hands back where to navigate.
//! - [`DetailViewer`] reads a merged record back by product id.
//!
//! [`SearchSession`] is the per-client list and interaction state; it is
//! owned by whoever drives the handoff, never shared process-wide.

pub mod dispatch;
pub mod resolve;
pub mod session;
pub mod view;

pub use dispatch::QueryDispatcher;
pub use resolve::{DetailResolver, Navigation};
pub use session::SearchSession;
pub use view::{DetailViewer, ProductView};
