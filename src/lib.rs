//! Bilibili live API helpers
//!
//! Thin, typed wrappers around the site's anonymous HTTP endpoints. Every
//! helper sends exactly one request and returns an [`Envelope`]: either the
//! validated subset of the upstream data or a classified [`Failure`]. No
//! helper returns a Rust error for upstream problems.
//!
//! # Architecture
//!
//! - [`client`]: explicit TLS mode, timeout and headers, and the
//!   [`Transport`](client::Transport) seam
//! - [`api`]: endpoint descriptors and [`BiliClient`]
//! - [`diagnostics`]: SSL capability probe and connectivity check
//! - [`server`]: local JSON gateway over the same helpers
//!
//! TLS verification is never switched globally. The SSL probe recommends a
//! [`TlsMode`] and the caller applies it to its own [`ClientFactory`].
//!
//! # Usage
//!
//! ```bash
//! bililive master-info --uid 143474500
//! bililive-server --port 4417
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use bililive_api::{BiliClient, Settings};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = BiliClient::from_settings(&Settings::default())?;
//! let envelope = client.master_info(143474500).await;
//! if let Some(info) = envelope.data() {
//!     println!("{} streams in room {}", info.info.uname, info.room_id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod server;
pub mod types;
pub mod utils;

pub use api::BiliClient;
pub use client::{ClientFactory, TlsMode};
pub use config::Settings;
pub use error::{Error, Result};
pub use types::{Envelope, Failure, PingResponse};
