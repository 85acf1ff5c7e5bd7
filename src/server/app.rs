//! Axum application setup
//!
//! Creates and configures the gateway router with routes and middleware.

use crate::{api::BiliClient, config::Settings};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Upstream client; replaced when an SSL probe is applied
    pub client: Arc<RwLock<BiliClient>>,
    /// Application settings
    pub settings: Arc<Settings>,
    /// Server start time for uptime calculation
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(settings: Settings) -> crate::Result<Self> {
        let client = BiliClient::from_settings(&settings)?;
        Ok(Self {
            client: Arc::new(RwLock::new(client)),
            settings: Arc::new(settings),
            start_time: std::time::Instant::now(),
        })
    }

    /// Snapshot of the current client; the lock is not held across requests
    pub async fn client(&self) -> BiliClient {
        self.client.read().await.clone()
    }
}

/// Create the gateway with routes and middleware
pub fn create_app(settings: Settings) -> crate::Result<Router> {
    Ok(router(AppState::new(settings)?))
}

/// Routes over an existing state
pub fn router(state: AppState) -> Router {
    use super::handlers;

    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/cookies/bnut", get(handlers::buvid_cookies))
        .route("/buvid/getbuvid", get(handlers::buvid3))
        .route("/buvid/spi", get(handlers::buvid_pair))
        .route("/live/master_info/{uid}", get(handlers::master_info))
        .route("/live/common_areas/{room_id}", get(handlers::common_areas))
        .route("/live/areas", get(handlers::area_list))
        .route("/live/room_info_old/{mid}", get(handlers::room_info_old))
        .route("/live/room_base_info/{room_id}", get(handlers::room_base_info))
        .route("/diagnostics/ssl_probe", post(handlers::ssl_probe))
        .route("/diagnostics/connectivity", get(handlers::connectivity))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_create_app_serves_ping() {
        let app = create_app(Settings::default()).unwrap();

        let response = app
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["tls_mode"], "verify");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = create_app(Settings::default()).unwrap();

        let response = app
            .oneshot(Request::get("/live/unknown").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_create_app_rejects_bad_user_agent() {
        let mut settings = Settings::default();
        settings.client.user_agent = "bad\nagent".to_string();
        assert!(create_app(settings).is_err());
    }
}
