//! Upstream API helpers
//!
//! [`endpoint`] holds the descriptors and the shared validation pipeline,
//! [`client`] the typed helpers built on top of it.

pub mod client;
pub mod endpoint;

pub use client::BiliClient;
pub use endpoint::{Endpoint, Host, call_and_collect_cookies, call_and_validate, deserialize_data};
