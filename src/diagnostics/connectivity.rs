//! Internet connectivity check
//!
//! Three stages, stopping at the first success:
//!
//! 1. raw TCP connect to a public DNS server
//! 2. HEAD against captive-portal style endpoints, any status below 500 counts
//! 3. plain GET against a fallback URL

use crate::client::{HttpRequest, ReqwestTransport, TlsMode, Transport};
use crate::config::ConnectivitySettings;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityCode {
    Success = 0,
    DnsFailed = 1,
    AllServicesFailed = 2,
    HttpFailed = 3,
}

impl Serialize for ConnectivityCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// Outcome of one service attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceCheck {
    pub provider: String,
    pub url: String,
    pub success: bool,
    pub error: Option<String>,
    pub status_code: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectivityData {
    pub dns_checked: bool,
    pub services_checked: Vec<ServiceCheck>,
    pub successful_service: Option<String>,
    pub latency_ms: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectivityReport {
    pub connected: bool,
    pub code: ConnectivityCode,
    pub message: String,
    pub data: ConnectivityData,
    pub checked_at: DateTime<Utc>,
}

impl ConnectivityReport {
    fn new() -> Self {
        Self {
            connected: false,
            code: ConnectivityCode::AllServicesFailed,
            message: "all connection attempts failed".to_string(),
            data: ConnectivityData {
                dns_checked: false,
                services_checked: Vec::new(),
                successful_service: None,
                latency_ms: None,
            },
            checked_at: Utc::now(),
        }
    }

    fn succeed(mut self, service: impl Into<String>, started: Instant) -> Self {
        let latency = started.elapsed().as_secs_f64() * 1000.0;
        let service = service.into();
        self.connected = true;
        self.code = ConnectivityCode::Success;
        self.message = format!("connected via {}, latency: {:.2}ms", service, latency);
        self.data.successful_service = Some(service);
        self.data.latency_ms = Some(latency);
        tracing::info!("{}", self.message);
        self
    }
}

/// Run the check with a fresh verifying client
pub async fn check_connectivity(settings: &ConnectivitySettings) -> ConnectivityReport {
    match ReqwestTransport::new(TlsMode::Verify) {
        Ok(transport) => check_connectivity_with(&transport, settings).await,
        Err(e) => {
            let mut report = ConnectivityReport::new();
            report.message = format!("unable to build HTTP client: {}", e);
            report
        }
    }
}

/// Run the check through a caller supplied transport
pub async fn check_connectivity_with<T>(
    transport: &T,
    settings: &ConnectivitySettings,
) -> ConnectivityReport
where
    T: Transport + ?Sized,
{
    let mut report = ConnectivityReport::new();

    let started = Instant::now();
    let dns_timeout = Duration::from_millis(settings.dns_timeout_ms);
    match tokio::time::timeout(dns_timeout, TcpStream::connect(&settings.dns_target)).await {
        Ok(Ok(_stream)) => {
            report.data.dns_checked = true;
            return report.succeed(format!("DNS ({})", settings.dns_target), started);
        }
        Ok(Err(e)) => {
            report.code = ConnectivityCode::DnsFailed;
            report.message = format!("DNS connection failed: {}", e);
        }
        Err(_) => {
            report.code = ConnectivityCode::DnsFailed;
            report.message = format!("DNS connection timed out after {}ms", settings.dns_timeout_ms);
        }
    }
    tracing::debug!("{}", report.message);

    let service_timeout = Duration::from_secs(settings.service_timeout_secs);
    for service in &settings.services {
        let started = Instant::now();
        let check = check_service(
            transport,
            &service.provider,
            &service.url,
            HttpRequest::head,
            service_timeout,
        )
        .await;
        let success = check.success;
        report.data.services_checked.push(check);
        if success {
            return report.succeed(service.provider.clone(), started);
        }
    }

    if settings.fallback_url.is_empty() {
        report.code = ConnectivityCode::AllServicesFailed;
        report.message = "all connection attempts failed".to_string();
        tracing::warn!("{}", report.message);
        return report;
    }

    let started = Instant::now();
    let provider = Url::parse(&settings.fallback_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| settings.fallback_url.clone());
    let check = check_service(
        transport,
        &provider,
        &settings.fallback_url,
        HttpRequest::get,
        service_timeout,
    )
    .await;
    let error = check.error.clone();
    let success = check.success;
    report.data.services_checked.push(check);
    if success {
        return report.succeed(provider, started);
    }

    report.code = ConnectivityCode::HttpFailed;
    report.message = format!(
        "all connection attempts failed: {}",
        error.unwrap_or_default()
    );
    tracing::warn!("{}", report.message);
    report
}

async fn check_service<T, B>(
    transport: &T,
    provider: &str,
    url: &str,
    build: B,
    timeout: Duration,
) -> ServiceCheck
where
    T: Transport + ?Sized,
    B: FnOnce(Url) -> HttpRequest,
{
    let mut check = ServiceCheck {
        provider: provider.to_string(),
        url: url.to_string(),
        success: false,
        error: None,
        status_code: None,
    };

    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            check.error = Some(format!("invalid URL: {}", e));
            return check;
        }
    };

    match transport.send(&build(parsed).with_timeout(timeout)).await {
        Ok(response) => {
            check.status_code = Some(response.status);
            if response.status < 500 {
                check.success = true;
            } else {
                check.error = Some(format!("server error: status {}", response.status));
            }
        }
        Err(err) => {
            check.error = Some(err.to_failure().to_string());
        }
    }

    tracing::debug!("connectivity {} ({}): {:?}", provider, url, check.error);
    check
}
