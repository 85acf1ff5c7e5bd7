//! Network diagnostics
//!
//! Neither check touches shared state; both return a report for the caller
//! to act on.

pub mod connectivity;
pub mod ssl_probe;

pub use connectivity::{
    ConnectivityCode, ConnectivityReport, ServiceCheck, check_connectivity, check_connectivity_with,
};
pub use ssl_probe::{SslProbeCode, SslProbeReport, probe_ssl, probe_ssl_with};
