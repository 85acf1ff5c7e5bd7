//! HTTP request handlers
//!
//! Every upstream route answers with the envelope: 200 on success, 400 when
//! the input was rejected before any request, 502 for everything else.

use crate::{
    api::{
        BiliClient, Endpoint,
        endpoint::{ANCHOR_COMMON_AREAS, MASTER_INFO, ROOM_BASE_INFO, ROOM_INFO_OLD},
    },
    diagnostics::{self, ConnectivityReport, SslProbeReport},
    server::app::AppState,
    types::{
        AnchorArea, Buvid3, BuvidCookies, BuvidPair, Envelope, Failure, MasterInfo, ParentArea,
        PingResponse, RoomBaseInfo, RoomInfoOld,
    },
    utils::version,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

type EnvelopeResponse<T> = (StatusCode, Json<Envelope<T>>);

/// HTTP status for an envelope
pub fn status_for<T>(envelope: &Envelope<T>) -> StatusCode {
    match envelope.failure() {
        None => StatusCode::OK,
        Some(Failure::InvalidInput(_)) => StatusCode::BAD_REQUEST,
        Some(_) => StatusCode::BAD_GATEWAY,
    }
}

fn respond<T: Serialize>(envelope: Envelope<T>) -> EnvelopeResponse<T> {
    (status_for(&envelope), Json(envelope))
}

/// Parse a numeric path segment, answering with an envelope when it is not one
fn parse_id<T: Serialize>(
    raw: &str,
    name: &str,
    endpoint: &Endpoint,
) -> Result<u64, EnvelopeResponse<T>> {
    raw.trim().parse().map_err(|_| {
        let failure = Failure::invalid_input(format!("{} must be a positive integer", name));
        tracing::warn!("{}: {} ({:?})", endpoint.failure_message(), failure, raw);
        respond(Envelope::err(endpoint.failure_message(), failure, None))
    })
}

/// Ping endpoint for health checks
///
/// GET /ping
pub async fn ping(State(state): State<AppState>) -> Json<PingResponse> {
    let uptime = state.start_time.elapsed().as_secs();
    let tls_mode = state.client().await.tls_mode();
    tracing::debug!("Ping response: uptime={}s, tls_mode={}", uptime, tls_mode);
    Json(PingResponse::new(uptime, version::get_version(), tls_mode.as_str()))
}

/// GET /cookies/bnut
pub async fn buvid_cookies(State(state): State<AppState>) -> EnvelopeResponse<BuvidCookies> {
    respond(state.client().await.fetch_buvid3_and_bnut().await)
}

/// GET /buvid/getbuvid
pub async fn buvid3(State(state): State<AppState>) -> EnvelopeResponse<Buvid3> {
    respond(state.client().await.fetch_buvid3().await)
}

/// GET /buvid/spi
pub async fn buvid_pair(State(state): State<AppState>) -> EnvelopeResponse<BuvidPair> {
    respond(state.client().await.fetch_buvid_pair().await)
}

/// GET /live/master_info/{uid}
pub async fn master_info(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> EnvelopeResponse<MasterInfo> {
    let uid = match parse_id(&uid, "uid", &MASTER_INFO) {
        Ok(id) => id,
        Err(response) => return response,
    };
    respond(state.client().await.master_info(uid).await)
}

/// GET /live/common_areas/{room_id}
pub async fn common_areas(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> EnvelopeResponse<Vec<AnchorArea>> {
    let room_id = match parse_id(&room_id, "room_id", &ANCHOR_COMMON_AREAS) {
        Ok(id) => id,
        Err(response) => return response,
    };
    respond(state.client().await.anchor_common_areas(room_id).await)
}

/// GET /live/areas
pub async fn area_list(State(state): State<AppState>) -> EnvelopeResponse<Vec<ParentArea>> {
    respond(state.client().await.area_list().await)
}

/// GET /live/room_info_old/{mid}
pub async fn room_info_old(
    State(state): State<AppState>,
    Path(mid): Path<String>,
) -> EnvelopeResponse<RoomInfoOld> {
    let mid = match parse_id(&mid, "mid", &ROOM_INFO_OLD) {
        Ok(id) => id,
        Err(response) => return response,
    };
    respond(state.client().await.room_info_old(mid).await)
}

/// GET /live/room_base_info/{room_id}
pub async fn room_base_info(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> EnvelopeResponse<RoomBaseInfo> {
    let room_id = match parse_id(&room_id, "room_id", &ROOM_BASE_INFO) {
        Ok(id) => id,
        Err(response) => return response,
    };
    respond(state.client().await.room_base_info(room_id).await)
}

#[derive(Debug, Default, Deserialize)]
pub struct SslProbeParams {
    /// Switch the gateway's client to the recommended mode
    #[serde(default)]
    pub apply: bool,
    /// Overrides the configured test URL
    pub url: Option<String>,
}

/// SSL capability probe
///
/// POST /diagnostics/ssl_probe
///
/// With `apply=true` a certificate failure switches the gateway's upstream
/// client to insecure mode. Nothing else is affected. Applying is only
/// allowed against the configured test URL.
pub async fn ssl_probe(
    State(state): State<AppState>,
    Query(params): Query<SslProbeParams>,
) -> Result<Json<SslProbeReport>, (StatusCode, String)> {
    let probe = &state.settings.probe;
    if params.apply && params.url.is_some() {
        tracing::warn!("Rejected SSL probe applying a caller supplied URL");
        return Err((
            StatusCode::BAD_REQUEST,
            "apply is only allowed with the configured test URL".to_string(),
        ));
    }
    let url = params.url.as_deref().unwrap_or(&probe.ssl_test_url);
    let mut report = diagnostics::probe_ssl(url, probe.timeout()).await;

    if params.apply {
        let mut client = state.client.write().await;
        let mut factory = client.factory().clone();
        if report.apply_to(&mut factory) {
            let rebuilt = BiliClient::new(factory, client.endpoints().clone()).map_err(|e| {
                tracing::error!("Failed to rebuild upstream client: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            })?;
            *client = rebuilt;
            tracing::info!("Upstream client switched to {}", client.tls_mode());
        }
    }

    Ok(Json(report))
}

/// GET /diagnostics/connectivity
pub async fn connectivity(State(state): State<AppState>) -> Json<ConnectivityReport> {
    Json(diagnostics::check_connectivity(&state.settings.connectivity).await)
}
