//! Local HTTP gateway
//!
//! Exposes every helper and diagnostic over HTTP for callers that cannot
//! link the library.

pub mod app;
pub mod handlers;

pub use app::{AppState, create_app, router};
