//! Result envelope returned by every API helper
//!
//! An [`Envelope`] is either `Ok` with the validated data or `Err` with a
//! [`Failure`]. It serializes to the flat JSON shape consumers expect:
//!
//! ```json
//! {"success": false, "message": "failed to retrieve master info",
//!  "data": null, "error": "HTTP error: 404", "kind": "http_status",
//!  "status_code": 404, "response_text": "..."}
//! ```
//!
//! Exactly one of `data` and `error` is non-null.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Fallback text when an upstream error body carries no message
pub const UNKNOWN_UPSTREAM_ERROR: &str = "unknown error";

/// Why a helper did not produce data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The request did not complete within its timeout
    #[error("request timed out")]
    Timeout,

    /// DNS resolution or TCP/TLS connection failed
    #[error("network connection error")]
    Connection,

    /// Any other transport level failure
    #[error("network request failed: {0}")]
    Transport(String),

    /// Upstream answered with a non-200 status
    #[error("HTTP error: {0}")]
    HttpStatus(u16),

    /// Upstream answered 200 but its own `code` was not 0
    #[error("{message}")]
    UpstreamApi { api_code: i64, message: String },

    /// A required field was absent or had the wrong type
    #[error("response is missing required field `{field}`: {detail}")]
    ResponseShape { field: String, detail: String },

    /// The body could not be decoded at all
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Rejected before any request was made
    #[error("invalid argument: {0}")]
    InvalidInput(String),
}

impl Failure {
    /// Stable snake_case tag for the failure category
    pub fn kind(&self) -> &'static str {
        match self {
            Failure::Timeout => "timeout",
            Failure::Connection => "connection",
            Failure::Transport(_) => "transport",
            Failure::HttpStatus(_) => "http_status",
            Failure::UpstreamApi { .. } => "upstream_api",
            Failure::ResponseShape { .. } => "response_shape",
            Failure::Decode(_) => "decode",
            Failure::InvalidInput(_) => "invalid_input",
        }
    }

    /// Upstream `code` carried by this failure, if any
    pub fn api_code(&self) -> Option<i64> {
        match self {
            Failure::UpstreamApi { api_code, .. } => Some(*api_code),
            _ => None,
        }
    }

    /// Whether the failure happened before an HTTP status was received
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Failure::Timeout | Failure::Connection | Failure::Transport(_)
        )
    }

    pub fn shape(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Failure::ResponseShape {
            field: field.into(),
            detail: detail.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Failure::InvalidInput(msg.into())
    }
}

/// Extra context attached to a failed envelope
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Parsed upstream body, serialized as `response_data`
    ResponseData(Value),
    /// Raw body of a non-200 response, serialized as `response_text`
    ResponseText(String),
    /// Cookie names that were set, serialized as `available_cookies`
    AvailableCookies(Vec<String>),
}

impl Diagnostic {
    fn key(&self) -> &'static str {
        match self {
            Diagnostic::ResponseData(_) => "response_data",
            Diagnostic::ResponseText(_) => "response_text",
            Diagnostic::AvailableCookies(_) => "available_cookies",
        }
    }
}

/// Uniform success/failure record
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Ok {
        message: String,
        data: T,
        status_code: u16,
        api_code: Option<i64>,
    },
    Err {
        message: String,
        failure: Failure,
        status_code: Option<u16>,
        api_code: Option<i64>,
        diagnostic: Option<Diagnostic>,
    },
}

impl<T> Envelope<T> {
    /// Successful envelope
    pub fn ok(message: impl Into<String>, data: T, status_code: u16) -> Self {
        Envelope::Ok {
            message: message.into(),
            data,
            status_code,
            api_code: None,
        }
    }

    /// Failed envelope; the upstream code is copied from the failure when present
    pub fn err(message: impl Into<String>, failure: Failure, status_code: Option<u16>) -> Self {
        let api_code = failure.api_code();
        Envelope::Err {
            message: message.into(),
            failure,
            status_code,
            api_code,
            diagnostic: None,
        }
    }

    /// Record the upstream `code`
    pub fn with_api_code(mut self, code: i64) -> Self {
        match &mut self {
            Envelope::Ok { api_code, .. } | Envelope::Err { api_code, .. } => {
                *api_code = Some(code)
            }
        }
        self
    }

    /// Attach diagnostics; ignored on success
    pub fn with_diagnostic(mut self, value: Diagnostic) -> Self {
        if let Envelope::Err { diagnostic, .. } = &mut self {
            *diagnostic = Some(value);
        }
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Ok { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Envelope::Ok { message, .. } | Envelope::Err { message, .. } => message,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Envelope::Ok { data, .. } => Some(data),
            Envelope::Err { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Envelope::Ok { .. } => None,
            Envelope::Err { failure, .. } => Some(failure),
        }
    }

    /// Human readable error text, `None` on success
    pub fn error(&self) -> Option<String> {
        self.failure().map(ToString::to_string)
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Envelope::Ok { status_code, .. } => Some(*status_code),
            Envelope::Err { status_code, .. } => *status_code,
        }
    }

    pub fn api_code(&self) -> Option<i64> {
        match self {
            Envelope::Ok { api_code, .. } | Envelope::Err { api_code, .. } => *api_code,
        }
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Envelope::Ok { .. } => None,
            Envelope::Err { diagnostic, .. } => diagnostic.as_ref(),
        }
    }

    /// Drop the metadata and keep the outcome
    pub fn into_result(self) -> Result<T, Failure> {
        match self {
            Envelope::Ok { data, .. } => Ok(data),
            Envelope::Err { failure, .. } => Err(failure),
        }
    }

    /// Transform the data of a successful envelope
    pub fn map<U, F>(self, f: F) -> Envelope<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Envelope::Ok {
                message,
                data,
                status_code,
                api_code,
            } => Envelope::Ok {
                message,
                data: f(data),
                status_code,
                api_code,
            },
            Envelope::Err {
                message,
                failure,
                status_code,
                api_code,
                diagnostic,
            } => Envelope::Err {
                message,
                failure,
                status_code,
                api_code,
                diagnostic,
            },
        }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            Envelope::Ok {
                message,
                data,
                status_code,
                api_code,
            } => {
                map.serialize_entry("success", &true)?;
                map.serialize_entry("message", message)?;
                map.serialize_entry("data", data)?;
                map.serialize_entry("error", &None::<String>)?;
                map.serialize_entry("status_code", status_code)?;
                if let Some(code) = api_code {
                    map.serialize_entry("api_code", code)?;
                }
            }
            Envelope::Err {
                message,
                failure,
                status_code,
                api_code,
                diagnostic,
            } => {
                map.serialize_entry("success", &false)?;
                map.serialize_entry("message", message)?;
                map.serialize_entry("data", &None::<()>)?;
                map.serialize_entry("error", &failure.to_string())?;
                map.serialize_entry("kind", failure.kind())?;
                map.serialize_entry("status_code", status_code)?;
                if let Some(code) = api_code {
                    map.serialize_entry("api_code", code)?;
                }
                if let Some(diagnostic) = diagnostic {
                    let key = diagnostic.key();
                    match diagnostic {
                        Diagnostic::ResponseData(value) => map.serialize_entry(key, value)?,
                        Diagnostic::ResponseText(text) => map.serialize_entry(key, text)?,
                        Diagnostic::AvailableCookies(names) => map.serialize_entry(key, names)?,
                    }
                }
            }
        }
        map.end()
    }
}

/// Pick the human readable error out of an upstream body: `message`, then `msg`
pub fn upstream_error_message(body: &Value) -> String {
    ["message", "msg"]
        .iter()
        .filter_map(|key| body.get(*key).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .unwrap_or(UNKNOWN_UPSTREAM_ERROR)
        .to_string()
}
