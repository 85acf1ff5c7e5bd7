//! Server mode CLI logic
//!
//! Contains the core logic for running the HTTP gateway.

use crate::{Settings, server::app, utils::version};
use anyhow::Result;

/// Arguments for server mode; `None` keeps the configured value
#[derive(Debug, Default)]
pub struct ServerArgs {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub insecure: bool,
}

impl ServerArgs {
    /// Apply command line overrides on top of loaded settings
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(host) = &self.host {
            settings.server.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if self.insecure {
            settings.client.verify_tls = false;
        }
    }
}

/// Run server mode with already loaded settings
pub async fn run_server_mode(args: ServerArgs, mut settings: Settings) -> Result<()> {
    args.apply(&mut settings);

    tracing::info!("Starting gateway v{}", version::get_version());

    let addr = parse_and_bind_address(&settings.server.host, settings.server.port).await?;
    let app = app::create_app(settings)?;

    tracing::info!("Gateway v{} listening on {}", version::get_version(), addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Parse host string and attempt to bind to the address
///
/// `::` falls back to `0.0.0.0` when IPv6 is unavailable.
pub async fn parse_and_bind_address(host: &str, port: u16) -> Result<std::net::SocketAddr> {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

    if host != "::" {
        if let Ok(ip) = host.parse::<IpAddr>() {
            let addr = SocketAddr::new(ip, port);
            tracing::debug!("Parsed address: {}", addr);
            return Ok(addr);
        }
        anyhow::bail!(
            "Invalid host address: {}. Use an IP address, '::' for IPv6 or '0.0.0.0' for IPv4",
            host
        );
    }

    let addr = SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), port);
    match tokio::net::TcpListener::bind(addr).await {
        Ok(_) => {
            tracing::debug!("IPv6 available on {}", addr);
            Ok(addr)
        }
        Err(e) => {
            tracing::warn!(
                "Could not listen on [::]:{} (Caused by {}), falling back to 0.0.0.0",
                port,
                e
            );
            Ok(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port))
        }
    }
}
