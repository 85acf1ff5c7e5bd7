//! Endpoint descriptors and the shared request/validate pipeline
//!
//! Every helper is one [`Endpoint`] plus an extractor. The pipeline is:
//!
//! 1. send exactly one request; transport failures become `status_code: null`
//! 2. any status other than 200 is an `HttpStatus` failure
//! 3. the body is decoded (JSON envelope or cookie jar)
//! 4. upstream `code` must be 0, `data` and the descriptor's required
//!    pointers must be present
//! 5. the extractor copies the documented subset into the envelope
//!
//! Nothing in here returns early with a Rust error: every outcome is an
//! [`Envelope`].

use crate::client::{HttpRequest, RawResponse, Transport};
use crate::types::{Diagnostic, Envelope, Failure, upstream_error_message};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

/// Upstream host an endpoint lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    Www,
    Api,
    Live,
}

/// Static description of one upstream endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Noun used in envelope messages
    pub label: &'static str,
    pub host: Host,
    /// Path relative to the host base, without a leading slash
    pub path: &'static str,
    /// JSON pointers inside `data` that must be present and non-null
    pub required: &'static [&'static str],
}

impl Endpoint {
    pub fn success_message(&self) -> String {
        format!("{} retrieved", self.label)
    }

    pub fn failure_message(&self) -> String {
        format!("failed to retrieve {}", self.label)
    }

    fn fail<D>(&self, failure: Failure, status_code: Option<u16>) -> Envelope<D> {
        tracing::warn!("{}: {}", self.failure_message(), failure);
        Envelope::err(self.failure_message(), failure, status_code)
    }
}

pub const BUVID_COOKIES: Endpoint = Endpoint {
    label: "buvid3 and b_nut cookies",
    host: Host::Www,
    path: "",
    required: &[],
};

pub const GET_BUVID: Endpoint = Endpoint {
    label: "buvid3",
    host: Host::Api,
    path: "x/web-frontend/getbuvid",
    required: &["/buvid"],
};

pub const FINGER_SPI: Endpoint = Endpoint {
    label: "buvid3 and buvid4",
    host: Host::Api,
    path: "x/frontend/finger/spi",
    required: &["/b_3", "/b_4"],
};

pub const MASTER_INFO: Endpoint = Endpoint {
    label: "master info",
    host: Host::Live,
    path: "live_user/v1/Master/info",
    required: &["/info/uname", "/room_id"],
};

pub const ANCHOR_COMMON_AREAS: Endpoint = Endpoint {
    label: "anchor common areas",
    host: Host::Live,
    path: "room/v1/Area/getMyChooseArea",
    required: &[],
};

pub const AREA_LIST: Endpoint = Endpoint {
    label: "area list",
    host: Host::Live,
    path: "room/v1/Area/getList",
    required: &[],
};

pub const ROOM_INFO_OLD: Endpoint = Endpoint {
    label: "room info",
    host: Host::Live,
    path: "room/v1/Room/getRoomInfoOld",
    required: &[],
};

pub const ROOM_BASE_INFO: Endpoint = Endpoint {
    label: "room base info",
    host: Host::Live,
    path: "xlive/web-room/v1/index/getRoomBaseInfo",
    required: &["/by_room_ids"],
};

/// Send the request and keep only 200 responses
async fn fetch<T, D>(
    transport: &T,
    endpoint: &Endpoint,
    request: &HttpRequest,
) -> Result<RawResponse, Envelope<D>>
where
    T: Transport + ?Sized,
{
    let response = transport
        .send(request)
        .await
        .map_err(|err| endpoint.fail(err.to_failure(), None))?;

    if response.status != 200 {
        let text = response.text();
        return Err(endpoint
            .fail(Failure::HttpStatus(response.status), Some(response.status))
            .with_diagnostic(Diagnostic::ResponseText(text)));
    }

    Ok(response)
}

/// One request against a JSON endpoint, validated and extracted
pub async fn call_and_validate<T, D, F>(
    transport: &T,
    endpoint: &Endpoint,
    request: &HttpRequest,
    extract: F,
) -> Envelope<D>
where
    T: Transport + ?Sized,
    F: FnOnce(&Value) -> Result<D, Failure>,
{
    match fetch(transport, endpoint, request).await {
        Ok(response) => validate_json(endpoint, &response, extract),
        Err(envelope) => envelope,
    }
}

/// One request whose result is read from the cookies it sets
pub async fn call_and_collect_cookies<T, D, F>(
    transport: &T,
    endpoint: &Endpoint,
    request: &HttpRequest,
    required: &[&str],
    extract: F,
) -> Envelope<D>
where
    T: Transport + ?Sized,
    F: FnOnce(&BTreeMap<String, String>) -> D,
{
    match fetch(transport, endpoint, request).await {
        Ok(response) => validate_cookies(endpoint, &response, required, extract),
        Err(envelope) => envelope,
    }
}

/// Validate a 200 JSON response: `code == 0`, `data` present, required pointers present
pub fn validate_json<D, F>(endpoint: &Endpoint, response: &RawResponse, extract: F) -> Envelope<D>
where
    F: FnOnce(&Value) -> Result<D, Failure>,
{
    let status = Some(response.status);
    let body = match response.json() {
        Ok(body) => body,
        Err(err) => {
            return endpoint
                .fail(Failure::Decode(err.to_string()), status)
                .with_diagnostic(Diagnostic::ResponseText(response.text()));
        }
    };

    let Some(api_code) = body.get("code").and_then(Value::as_i64) else {
        return endpoint
            .fail(Failure::shape("code", "upstream envelope has no numeric code"), status)
            .with_diagnostic(Diagnostic::ResponseData(body));
    };

    if api_code != 0 {
        let failure = Failure::UpstreamApi {
            api_code,
            message: upstream_error_message(&body),
        };
        return endpoint
            .fail(failure, status)
            .with_diagnostic(Diagnostic::ResponseData(body));
    }

    let data = match body.get("data") {
        Some(data) if !data.is_null() => data,
        _ => {
            return endpoint
                .fail(Failure::shape("data", "field is absent or null"), status)
                .with_api_code(api_code)
                .with_diagnostic(Diagnostic::ResponseData(body));
        }
    };

    let missing = endpoint
        .required
        .iter()
        .find(|pointer| data.pointer(pointer).is_none_or(Value::is_null));
    if let Some(pointer) = missing {
        return endpoint
            .fail(Failure::shape(pointer_field(pointer), "field is absent or null"), status)
            .with_api_code(api_code)
            .with_diagnostic(Diagnostic::ResponseData(body));
    }

    match extract(data) {
        Ok(extracted) => {
            tracing::info!("{}", endpoint.success_message());
            Envelope::ok(endpoint.success_message(), extracted, response.status)
                .with_api_code(api_code)
        }
        Err(failure) => endpoint
            .fail(failure, status)
            .with_api_code(api_code)
            .with_diagnostic(Diagnostic::ResponseData(body)),
    }
}

/// Validate a 200 response carrying the required cookies
pub fn validate_cookies<D, F>(
    endpoint: &Endpoint,
    response: &RawResponse,
    required: &[&str],
    extract: F,
) -> Envelope<D>
where
    F: FnOnce(&BTreeMap<String, String>) -> D,
{
    let cookies = response.cookie_map();
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|name| !cookies.contains_key(*name))
        .collect();

    if !missing.is_empty() {
        return endpoint
            .fail(
                Failure::shape(missing.join(", "), "cookie not set by upstream"),
                Some(response.status),
            )
            .with_diagnostic(Diagnostic::AvailableCookies(cookies.into_keys().collect()));
    }

    tracing::info!("{}", endpoint.success_message());
    Envelope::ok(endpoint.success_message(), extract(&cookies), response.status)
}

/// Typed extraction of `data`, reporting the offending path on mismatch
pub fn deserialize_data<D: DeserializeOwned>(data: &Value) -> Result<D, Failure> {
    serde_path_to_error::deserialize(data).map_err(|err| {
        let path = err.path().to_string();
        let field = match path.as_str() {
            "." => "data".to_string(),
            p if p.starts_with('[') => format!("data{}", p),
            p => format!("data.{}", p),
        };
        Failure::shape(field, err.inner().to_string())
    })
}

fn pointer_field(pointer: &str) -> String {
    format!("data{}", pointer.replace('/', "."))
}
