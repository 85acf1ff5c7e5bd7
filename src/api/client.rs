//! Endpoint helpers
//!
//! [`BiliClient`] owns one transport and the base URLs. Each helper sends
//! exactly one request and always returns an [`Envelope`].

use super::endpoint::{
    self, ANCHOR_COMMON_AREAS, AREA_LIST, BUVID_COOKIES, Endpoint, FINGER_SPI, GET_BUVID, Host,
    MASTER_INFO, ROOM_BASE_INFO, ROOM_INFO_OLD, deserialize_data,
};
use crate::client::{ClientFactory, HttpMethod, HttpRequest, ReqwestTransport, TlsMode, Transport};
use crate::config::{EndpointSettings, Settings};
use crate::types::{
    AnchorArea, Buvid3, BuvidCookies, BuvidPair, Envelope, Failure, MasterInfo, ParentArea,
    RoomBaseInfo, RoomInfoOld,
};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use url::Url;

/// Cookie names the landing page must set
const BUVID_COOKIE_NAMES: [&str; 2] = ["buvid3", "b_nut"];

/// Client for the upstream live streaming API
pub struct BiliClient<T: Transport = ReqwestTransport> {
    transport: Arc<T>,
    factory: ClientFactory,
    endpoints: EndpointSettings,
}

impl<T: Transport> Clone for BiliClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            factory: self.factory.clone(),
            endpoints: self.endpoints.clone(),
        }
    }
}

impl<T: Transport> fmt::Debug for BiliClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BiliClient")
            .field("transport", &self.transport)
            .field("tls_mode", &self.factory.tls_mode())
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

impl BiliClient<ReqwestTransport> {
    /// Build a client whose transport follows the factory's TLS mode
    pub fn new(factory: ClientFactory, endpoints: EndpointSettings) -> crate::Result<Self> {
        let transport = factory.build_transport()?;
        Ok(Self::with_transport(transport, factory, endpoints))
    }

    pub fn from_settings(settings: &Settings) -> crate::Result<Self> {
        Self::new(
            ClientFactory::from_settings(&settings.client),
            settings.endpoints.clone(),
        )
    }
}

impl<T: Transport> BiliClient<T> {
    /// Use a caller supplied transport, e.g. a scripted one in tests
    pub fn with_transport(transport: T, factory: ClientFactory, endpoints: EndpointSettings) -> Self {
        Self {
            transport: Arc::new(transport),
            factory,
            endpoints,
        }
    }

    pub fn factory(&self) -> &ClientFactory {
        &self.factory
    }

    pub fn endpoints(&self) -> &EndpointSettings {
        &self.endpoints
    }

    pub fn tls_mode(&self) -> TlsMode {
        self.transport.tls_mode()
    }

    fn base(&self, host: Host) -> &str {
        match host {
            Host::Www => &self.endpoints.www_base,
            Host::Api => &self.endpoints.api_base,
            Host::Live => &self.endpoints.live_base,
        }
    }

    /// Absolute URL of an endpoint; base paths are kept
    fn url(&self, endpoint: &Endpoint) -> Result<Url, Failure> {
        let mut base = self.base(endpoint.host).to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base)
            .and_then(|url| url.join(endpoint.path))
            .map_err(|e| Failure::Transport(format!("invalid endpoint URL {}: {}", base, e)))
    }

    fn request(&self, endpoint: &Endpoint, query: &[(&str, String)]) -> Result<HttpRequest, Failure> {
        let request = self.factory.request(HttpMethod::Get, self.url(endpoint)?);
        Ok(query
            .iter()
            .fold(request, |req, (key, value)| req.with_query(*key, value.clone())))
    }

    async fn call<D, F>(&self, endpoint: &Endpoint, query: &[(&str, String)], extract: F) -> Envelope<D>
    where
        F: FnOnce(&Value) -> Result<D, Failure>,
    {
        match self.request(endpoint, query) {
            Ok(request) => {
                endpoint::call_and_validate(self.transport.as_ref(), endpoint, &request, extract)
                    .await
            }
            Err(failure) => Envelope::err(endpoint.failure_message(), failure, None),
        }
    }

    fn reject<D>(endpoint: &Endpoint, name: &str) -> Envelope<D> {
        let failure = Failure::invalid_input(format!("{} must be a positive integer", name));
        tracing::warn!("{}: {}", endpoint.failure_message(), failure);
        Envelope::err(endpoint.failure_message(), failure, None)
    }

    /// `buvid3` and `b_nut` from the cookies set by the landing page
    pub async fn fetch_buvid3_and_bnut(&self) -> Envelope<BuvidCookies> {
        let request = match self.request(&BUVID_COOKIES, &[]) {
            Ok(request) => request,
            Err(failure) => return Envelope::err(BUVID_COOKIES.failure_message(), failure, None),
        };
        endpoint::call_and_collect_cookies(
            self.transport.as_ref(),
            &BUVID_COOKIES,
            &request,
            &BUVID_COOKIE_NAMES,
            |cookies| BuvidCookies {
                buvid3: cookies["buvid3"].clone(),
                b_nut: cookies["b_nut"].clone(),
            },
        )
        .await
    }

    /// `buvid3` from `x/web-frontend/getbuvid`
    pub async fn fetch_buvid3(&self) -> Envelope<Buvid3> {
        self.call(&GET_BUVID, &[], deserialize_data).await
    }

    /// `buvid3` and `buvid4` from `x/frontend/finger/spi`
    pub async fn fetch_buvid_pair(&self) -> Envelope<BuvidPair> {
        self.call(&FINGER_SPI, &[], deserialize_data).await
    }

    /// Streamer profile for a user id
    pub async fn master_info(&self, uid: u64) -> Envelope<MasterInfo> {
        if uid == 0 {
            return Self::reject(&MASTER_INFO, "uid");
        }
        self.call(&MASTER_INFO, &[("uid", uid.to_string())], deserialize_data)
            .await
    }

    /// Areas a streamer used recently; every entry must be complete
    pub async fn anchor_common_areas(&self, room_id: u64) -> Envelope<Vec<AnchorArea>> {
        if room_id == 0 {
            return Self::reject(&ANCHOR_COMMON_AREAS, "room_id");
        }
        self.call(
            &ANCHOR_COMMON_AREAS,
            &[("roomid", room_id.to_string())],
            deserialize_data,
        )
        .await
    }

    /// Full area tree
    pub async fn area_list(&self) -> Envelope<Vec<ParentArea>> {
        self.call(&AREA_LIST, &[], deserialize_data).await
    }

    /// Legacy room summary for a user id
    pub async fn room_info_old(&self, mid: u64) -> Envelope<RoomInfoOld> {
        if mid == 0 {
            return Self::reject(&ROOM_INFO_OLD, "mid");
        }
        self.call(&ROOM_INFO_OLD, &[("mid", mid.to_string())], deserialize_data)
            .await
    }

    /// Room details; the entry keyed by `room_id` is preferred, else the first one
    pub async fn room_base_info(&self, room_id: u64) -> Envelope<RoomBaseInfo> {
        if room_id == 0 {
            return Self::reject(&ROOM_BASE_INFO, "room_id");
        }
        let query = [
            ("req_biz", "web_room_componet".to_string()),
            ("room_ids", room_id.to_string()),
        ];
        self.call(&ROOM_BASE_INFO, &query, |data| {
            let rooms = data["by_room_ids"]
                .as_object()
                .ok_or_else(|| Failure::shape("data.by_room_ids", "expected an object"))?;
            let key = room_id.to_string();
            let (key, room) = rooms
                .get_key_value(&key)
                .or_else(|| rooms.iter().next())
                .ok_or_else(|| Failure::shape("data.by_room_ids", "no rooms returned"))?;
            serde_path_to_error::deserialize(room).map_err(|err| {
                let field = match err.path().to_string().as_str() {
                    "." => format!("data.by_room_ids.{}", key),
                    path => format!("data.by_room_ids.{}.{}", key, path),
                };
                Failure::shape(field, err.inner().to_string())
            })
        })
        .await
    }
}
