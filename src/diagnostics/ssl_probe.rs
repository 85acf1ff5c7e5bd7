//! TLS certificate verification probe
//!
//! [`probe_ssl`] sends one HEAD request with verification forced on and
//! reports what happened. It never changes any client: when certificates
//! cannot be verified it recommends [`TlsMode::Insecure`], and the caller
//! decides whether to [`SslProbeReport::apply_to`] its own factory.

use crate::client::{
    ClientFactory, HttpRequest, ReqwestTransport, TlsMode, Transport, TransportErrorKind,
};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::time::Duration;
use url::Url;

/// Probe outcome, serialized as its numeric code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SslProbeCode {
    Success = 0,
    CertificateError = 1,
    NetworkError = 2,
    UnknownError = 3,
}

impl SslProbeCode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl Serialize for SslProbeCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SslProbeData {
    pub test_url: String,
    pub timeout_secs: u64,
    pub status_code: Option<u16>,
    pub ssl_verification_enabled: bool,
    pub ssl_context_modified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SslProbeReport {
    pub success: bool,
    pub code: SslProbeCode,
    pub message: String,
    pub data: SslProbeData,
    pub checked_at: DateTime<Utc>,
    pub recommended_tls_mode: TlsMode,
}

impl SslProbeReport {
    fn new(test_url: &str, timeout: Duration) -> Self {
        Self {
            success: true,
            code: SslProbeCode::Success,
            message: "SSL certificate verification works".to_string(),
            data: SslProbeData {
                test_url: test_url.to_string(),
                timeout_secs: timeout.as_secs(),
                status_code: None,
                ssl_verification_enabled: true,
                ssl_context_modified: false,
            },
            checked_at: Utc::now(),
            recommended_tls_mode: TlsMode::Verify,
        }
    }

    fn fail(mut self, code: SslProbeCode, message: String) -> Self {
        self.success = false;
        self.code = code;
        self.message = message;
        self
    }

    /// Switch `factory` to the recommended mode
    ///
    /// Only a certificate failure changes anything. Returns whether the
    /// factory was modified.
    pub fn apply_to(&mut self, factory: &mut ClientFactory) -> bool {
        if self.code != SslProbeCode::CertificateError {
            return false;
        }
        factory.set_tls_mode(self.recommended_tls_mode);
        self.data.ssl_context_modified = true;
        tracing::warn!(
            "TLS verification disabled after failed probe against {}",
            self.data.test_url
        );
        true
    }
}

/// Probe `test_url` with a fresh verifying client
pub async fn probe_ssl(test_url: &str, timeout: Duration) -> SslProbeReport {
    match ReqwestTransport::new(TlsMode::Verify) {
        Ok(transport) => probe_ssl_with(&transport, test_url, timeout).await,
        Err(e) => SslProbeReport::new(test_url, timeout)
            .fail(SslProbeCode::UnknownError, format!("unknown error: {}", e)),
    }
}

/// Probe through a caller supplied transport
///
/// The transport is expected to verify certificates.
pub async fn probe_ssl_with<T>(transport: &T, test_url: &str, timeout: Duration) -> SslProbeReport
where
    T: Transport + ?Sized,
{
    let mut report = SslProbeReport::new(test_url, timeout);

    let url = match Url::parse(test_url) {
        Ok(url) => url,
        Err(e) => {
            report.data.ssl_verification_enabled = false;
            return report.fail(
                SslProbeCode::NetworkError,
                format!("network request failed: invalid test URL: {}", e),
            );
        }
    };

    let request = HttpRequest::head(url).with_timeout(timeout);
    let report = match transport.send(&request).await {
        Ok(response) => {
            report.data.status_code = Some(response.status);
            if response.status >= 400 {
                report.fail(
                    SslProbeCode::NetworkError,
                    format!("test request returned error status: {}", response.status),
                )
            } else {
                report
            }
        }
        Err(err) => {
            report.data.ssl_verification_enabled = false;
            if err.kind == TransportErrorKind::Certificate {
                report.recommended_tls_mode = TlsMode::Insecure;
                report.fail(
                    SslProbeCode::CertificateError,
                    format!("SSL certificate verification failed: {}", err),
                )
            } else {
                report.fail(
                    SslProbeCode::NetworkError,
                    format!("network request failed: {}", err),
                )
            }
        }
    };

    if report.success {
        tracing::info!("{}", report.message);
    } else {
        tracing::warn!("{}", report.message);
    }
    report
}
