//! Configuration management
//!
//! This module handles loading and managing configuration settings
//! for both query and server modes.

pub mod loader;
pub mod settings;

pub use loader::{ConfigLoader, default_config_path};
pub use settings::{
    ClientSettings, ConnectivityService, ConnectivitySettings, EndpointSettings, LoggingSettings,
    ProbeSettings, ServerSettings, Settings,
};
