//! Error handling for the API helpers
//!
//! Envelope-level failures live in [`crate::types::Failure`]; this module holds
//! the crate error used for configuration and client construction.

pub mod types;

pub use types::{Error, Result};
