//! Gateway-only response types

use serde::{Deserialize, Serialize};

/// Ping response for health checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    /// Server uptime in seconds
    pub server_uptime: u64,

    /// Server version
    pub version: String,

    /// TLS mode currently used for upstream requests
    pub tls_mode: String,
}

impl PingResponse {
    /// Create a new ping response
    pub fn new(server_uptime: u64, version: impl Into<String>, tls_mode: impl Into<String>) -> Self {
        Self {
            server_uptime,
            version: version.into(),
            tls_mode: tls_mode.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_response() {
        let response = PingResponse::new(3600, "1.0.0", "verify");
        assert_eq!(response.server_uptime, 3600);
        assert_eq!(response.version, "1.0.0");
        assert_eq!(response.tls_mode, "verify");
    }

    #[test]
    fn test_ping_response_serialization() {
        let json = serde_json::to_value(PingResponse::new(1, "0.3.0", "insecure")).unwrap();
        assert_eq!(json["server_uptime"], 1);
        assert_eq!(json["tls_mode"], "insecure");
    }
}
