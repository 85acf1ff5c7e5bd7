//! Explicit client configuration
//!
//! TLS verification, timeout and headers travel together in a
//! [`ClientFactory`]. Nothing here is process-wide: switching a factory to
//! [`TlsMode::Insecure`] only affects transports built from that factory.

use super::transport::{HttpMethod, HttpRequest, ReqwestTransport, header_map};
use crate::config::{ClientSettings, settings::DEFAULT_USER_AGENT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Header name to value, sent with every request built by a factory
pub type HeaderSet = BTreeMap<String, String>;

/// Whether upstream TLS certificates are checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsMode {
    #[default]
    Verify,
    Insecure,
}

impl TlsMode {
    pub fn from_verify(verify: bool) -> Self {
        if verify { Self::Verify } else { Self::Insecure }
    }

    pub fn verifies(self) -> bool {
        matches!(self, Self::Verify)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Verify => "verify",
            Self::Insecure => "insecure",
        }
    }
}

impl fmt::Display for TlsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// TLS mode, timeout and headers for outgoing requests
#[derive(Debug, Clone, PartialEq)]
pub struct ClientFactory {
    tls_mode: TlsMode,
    timeout: Duration,
    headers: HeaderSet,
}

impl Default for ClientFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientFactory {
    /// Verifying factory with a 30 second timeout and a browser user agent
    pub fn new() -> Self {
        let mut headers = HeaderSet::new();
        headers.insert("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string());
        Self {
            tls_mode: TlsMode::Verify,
            timeout: Duration::from_secs(30),
            headers,
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::new()
            .with_tls_mode(TlsMode::from_verify(settings.verify_tls))
            .with_timeout(settings.timeout())
            .with_header("User-Agent", settings.user_agent.clone())
    }

    pub fn with_tls_mode(mut self, tls_mode: TlsMode) -> Self {
        self.tls_mode = tls_mode;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add or replace one header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Merge a caller supplied header set; caller values win
    pub fn with_headers(mut self, headers: HeaderSet) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Switch TLS mode in place
    pub fn set_tls_mode(&mut self, tls_mode: TlsMode) {
        self.tls_mode = tls_mode;
    }

    pub fn tls_mode(&self) -> TlsMode {
        self.tls_mode
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    /// Build a transport honouring this factory's TLS mode
    pub fn build_transport(&self) -> crate::Result<ReqwestTransport> {
        header_map(&self.headers)?;
        if !self.tls_mode.verifies() {
            tracing::warn!("TLS certificate verification is disabled for this client");
        }
        ReqwestTransport::new(self.tls_mode)
    }

    /// Request pre-filled with this factory's headers and timeout
    pub fn request(&self, method: HttpMethod, url: Url) -> HttpRequest {
        let request = match method {
            HttpMethod::Get => HttpRequest::get(url),
            HttpMethod::Head => HttpRequest::head(url),
        };
        request
            .with_headers(self.headers.clone())
            .with_timeout(self.timeout)
    }
}
