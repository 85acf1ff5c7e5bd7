//! Single-request HTTP transport
//!
//! [`Transport`] is the seam every helper and probe goes through: one request
//! in, one [`RawResponse`] or one classified [`TransportError`] out. There are
//! no retries; the first failure is surfaced.

use super::factory::{HeaderSet, TlsMode};
use crate::types::Failure;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// HTTP method used by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Head,
}

/// A fully described outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub query: Vec<(String, String)>,
    pub headers: HeaderSet,
    pub timeout: Duration,
}

impl HttpRequest {
    /// GET request with a 30 second timeout and no headers
    pub fn get(url: Url) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// HEAD request with a 30 second timeout and no headers
    pub fn head(url: Url) -> Self {
        Self::new(HttpMethod::Head, url)
    }

    fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            query: Vec::new(),
            headers: HeaderSet::new(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Append a query parameter
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Replace the header set
    pub fn with_headers(mut self, headers: HeaderSet) -> Self {
        self.headers = headers;
        self
    }

    /// Set the timeout covering connect, headers and body
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Status, body and cookies of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
    /// `(name, value)` pairs from `Set-Cookie`, in arrival order
    pub cookies: Vec<(String, String)>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
            cookies: Vec::new(),
        }
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    /// Body decoded as UTF-8, invalid sequences replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body parsed as JSON
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_slice(&self.body)
    }

    /// Cookies by name; a later cookie with the same name wins
    pub fn cookie_map(&self) -> BTreeMap<String, String> {
        self.cookies.iter().cloned().collect()
    }
}

/// Transport failure category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    Timeout,
    Connection,
    Certificate,
    Other,
}

/// A request that produced no HTTP status
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout() -> Self {
        Self::new(TransportErrorKind::Timeout, "operation timed out")
    }

    /// Classify a reqwest error, walking its source chain for TLS causes
    ///
    /// The request URL is stripped first and only the sources are inspected,
    /// so nothing caller supplied can make a failure look like a TLS one.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        let err = err.without_url();
        let message = error_chain(&err);
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if is_certificate_failure(&err) {
            TransportErrorKind::Certificate
        } else if err.is_connect() {
            TransportErrorKind::Connection
        } else {
            TransportErrorKind::Other
        };
        Self { kind, message }
    }

    /// Envelope failure for this transport error
    pub fn to_failure(&self) -> Failure {
        match self.kind {
            TransportErrorKind::Timeout => Failure::Timeout,
            TransportErrorKind::Connection => Failure::Connection,
            TransportErrorKind::Certificate => Failure::Transport(format!(
                "certificate verification failed: {}",
                self.message
            )),
            TransportErrorKind::Other => Failure::Transport(self.message.clone()),
        }
    }
}

/// Render an error and all of its sources as `outer: inner: root`
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !parts.last().is_some_and(|last| last.ends_with(&text)) {
            parts.push(text);
        }
        source = cause.source();
    }
    parts.join(": ")
}

/// Whether any source of `err` is a rejected peer certificate
///
/// rustls errors reach us boxed inside an `io::Error`, whose own `source()`
/// skips the wrapped error, so the payload is unwrapped with `get_ref`.
pub fn is_certificate_failure(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        let rustls_error = cause.downcast_ref::<rustls::Error>().or_else(|| {
            cause
                .downcast_ref::<std::io::Error>()
                .and_then(|io| io.get_ref())
                .and_then(|inner| inner.downcast_ref::<rustls::Error>())
        });
        if matches!(rustls_error, Some(rustls::Error::InvalidCertificate(_))) {
            return true;
        }
        if is_certificate_message(&cause.to_string()) {
            return true;
        }
        source = cause.source();
    }
    false
}

/// Whether a single error message is a certificate validation failure
///
/// Matches both rustls (`invalid peer certificate: UnknownIssuer`) and
/// OpenSSL (`certificate verify failed`) wording.
pub fn is_certificate_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    ["invalid peer certificate", "certificate verify failed"]
        .iter()
        .any(|needle| lower.contains(needle))
}

/// One request, one response
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn send(&self, request: &HttpRequest) -> Result<RawResponse, TransportError>;

    /// TLS mode this transport was built with
    fn tls_mode(&self) -> TlsMode;
}

/// Production transport backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    tls_mode: TlsMode,
}

impl ReqwestTransport {
    /// Build a client for the given TLS mode
    ///
    /// Cookies are read from each response but never stored between requests.
    pub fn new(tls_mode: TlsMode) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!tls_mode.verifies())
            .build()?;
        Ok(Self { client, tls_mode })
    }
}

pub(crate) fn header_map(headers: &HeaderSet) -> crate::Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| crate::Error::invalid_header(name))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| crate::Error::invalid_header(name))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<RawResponse, TransportError> {
        let headers = header_map(&request.headers)
            .map_err(|e| TransportError::new(TransportErrorKind::Other, e.to_string()))?;

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(request.url.clone()),
            HttpMethod::Head => self.client.head(request.url.clone()),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        tracing::debug!("{:?} {} query={:?}", request.method, request.url, request.query);

        let response = builder
            .headers(headers)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(TransportError::from_reqwest)?;

        let status = response.status().as_u16();
        let cookies = response
            .cookies()
            .map(|cookie| (cookie.name().to_string(), cookie.value().to_string()))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(TransportError::from_reqwest)?
            .to_vec();

        tracing::debug!("{} -> {} ({} bytes)", request.url, status, body.len());

        Ok(RawResponse {
            status,
            body,
            cookies,
        })
    }

    fn tls_mode(&self) -> TlsMode {
        self.tls_mode
    }
}
