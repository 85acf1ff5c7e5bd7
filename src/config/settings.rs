//! Configuration settings structure
//!
//! Defines the main settings structure and loading logic for the API helpers.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Desktop browser user agent sent when nothing else is configured
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

/// Main configuration settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Outgoing HTTP client configuration
    pub client: ClientSettings,
    /// Upstream base URLs
    pub endpoints: EndpointSettings,
    /// SSL probe configuration
    pub probe: ProbeSettings,
    /// Connectivity check configuration
    pub connectivity: ConnectivitySettings,
    /// Local gateway configuration
    pub server: ServerSettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Outgoing HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Verify upstream TLS certificates
    pub verify_tls: bool,
}

/// Upstream base URLs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointSettings {
    /// Main site, used for cookie bootstrap
    pub www_base: String,
    /// General API host
    pub api_base: String,
    /// Live streaming API host
    pub live_base: String,
}

/// SSL probe configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    /// URL requested with verification forced on
    pub ssl_test_url: String,
    /// Probe timeout in seconds
    pub timeout_secs: u64,
}

/// A single connectivity check target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectivityService {
    /// Who operates the endpoint
    pub provider: String,
    /// Endpoint URL
    pub url: String,
}

/// Connectivity check configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectivitySettings {
    /// `host:port` of the raw TCP check
    pub dns_target: String,
    /// Timeout of the raw TCP check in milliseconds
    pub dns_timeout_ms: u64,
    /// Timeout of each service check in seconds
    pub service_timeout_secs: u64,
    /// Services tried in order after the TCP check fails
    pub services: Vec<ConnectivityService>,
    /// Last resort plain HTTP target
    pub fallback_url: String,
}

/// Local gateway configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level; each binary falls back to its own default when unset
    pub level: Option<String>,
    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            verify_tls: true,
        }
    }
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            www_base: "https://www.bilibili.com".to_string(),
            api_base: "https://api.bilibili.com".to_string(),
            live_base: "https://api.live.bilibili.com".to_string(),
        }
    }
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            ssl_test_url: "https://api.bilibili.com".to_string(),
            timeout_secs: 5,
        }
    }
}

impl Default for ConnectivitySettings {
    fn default() -> Self {
        let services = [
            ("Google", "http://www.gstatic.com/generate_204"),
            ("Google", "http://connectivitycheck.gstatic.com/generate_204"),
            ("Apple", "http://captive.apple.com"),
            ("Microsoft", "http://www.msftconnecttest.com/connecttest.txt"),
            ("Cloudflare", "http://cp.cloudflare.com/"),
            ("Firefox", "http://detectportal.firefox.com/success.txt"),
            ("V2ex", "http://www.v2ex.com/generate_204"),
            ("Xiaomi", "http://connect.rom.miui.com/generate_204"),
            ("Huawei", "http://connectivitycheck.platform.hicloud.com/generate_204"),
            ("Vivo", "http://wifi.vivo.com.cn/generate_204"),
        ]
        .into_iter()
        .map(|(provider, url)| ConnectivityService {
            provider: provider.to_string(),
            url: url.to_string(),
        })
        .collect();

        Self {
            dns_target: "8.8.8.8:53".to_string(),
            dns_timeout_ms: 2000,
            service_timeout_secs: 3,
            services,
            fallback_url: "http://example.com".to_string(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4417,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: None,
            verbose: false,
        }
    }
}

impl LoggingSettings {
    /// Configured level, or `default` when none was set
    pub fn level_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.level.as_deref().unwrap_or(default)
    }
}

impl ClientSettings {
    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ProbeSettings {
    /// Probe timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load settings from environment variables
    pub fn from_env() -> crate::Result<Self> {
        Self::default().merge_with_env()
    }

    /// Apply environment variable overrides on top of these settings
    pub fn merge_with_env(self) -> crate::Result<Self> {
        self.merge_with_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`, keyed by environment variable name
    pub fn merge_with_vars<F>(mut self, lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(user_agent) = lookup("BILILIVE_USER_AGENT") {
            self.client.user_agent = user_agent;
        }

        if let Some(timeout) = lookup("BILILIVE_TIMEOUT") {
            self.client.timeout_secs = timeout
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid timeout: {}", e)))?;
        }

        if let Some(verify) = lookup("BILILIVE_VERIFY_TLS") {
            self.client.verify_tls = parse_bool(&verify)
                .ok_or_else(|| crate::Error::Config(format!("Invalid TLS flag: {}", verify)))?;
        }

        if let Some(base) = lookup("BILILIVE_WWW_BASE") {
            self.endpoints.www_base = base;
        }

        if let Some(base) = lookup("BILILIVE_API_BASE") {
            self.endpoints.api_base = base;
        }

        if let Some(base) = lookup("BILILIVE_LIVE_BASE") {
            self.endpoints.live_base = base;
        }

        if let Some(host) = lookup("BILILIVE_SERVER_HOST") {
            self.server.host = host;
        }

        if let Some(port) = lookup("BILILIVE_SERVER_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid port: {}", e)))?;
        }

        if let Some(level) = lookup("BILILIVE_LOG_LEVEL") {
            self.logging.level = Some(level);
        }

        Ok(self)
    }

    /// Reject settings no request could be made with
    pub fn validate(&self) -> crate::Result<()> {
        for (name, base) in [
            ("www_base", &self.endpoints.www_base),
            ("api_base", &self.endpoints.api_base),
            ("live_base", &self.endpoints.live_base),
            ("ssl_test_url", &self.probe.ssl_test_url),
        ] {
            Url::parse(base)
                .map_err(|e| crate::Error::Config(format!("Invalid {}: {} ({})", name, base, e)))?;
        }

        if self.client.timeout_secs == 0 {
            return Err(crate::Error::config("Client timeout must be positive"));
        }

        if self.probe.timeout_secs == 0 {
            return Err(crate::Error::config("Probe timeout must be positive"));
        }

        if self.client.user_agent.trim().is_empty() {
            return Err(crate::Error::config("User agent must not be empty"));
        }

        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
