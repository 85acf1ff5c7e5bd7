//! HTTP client wrapper
//!
//! Issues exactly one request per call with explicit headers, TLS mode and
//! timeout, and classifies transport failures.

pub mod factory;
pub mod transport;

pub use factory::{ClientFactory, HeaderSet, TlsMode};
pub use transport::{
    HttpMethod, HttpRequest, RawResponse, ReqwestTransport, Transport, TransportError,
    TransportErrorKind,
};
