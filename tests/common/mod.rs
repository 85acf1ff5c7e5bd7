//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

/// Test helper functions
pub mod helpers {
    use bililive_api::{BiliClient, ClientFactory, config::Settings};
    use serde_json::{Value, json};
    use std::time::Duration;
    use wiremock::MockServer;

    /// Settings whose three upstream hosts all point at `server`
    pub fn settings_for(server: &MockServer) -> Settings {
        let mut settings = Settings::default();
        settings.endpoints.www_base = server.uri();
        settings.endpoints.api_base = server.uri();
        settings.endpoints.live_base = server.uri();
        settings
    }

    /// Client against `server` with a short timeout
    pub fn client_for(server: &MockServer) -> BiliClient {
        let settings = settings_for(server);
        let factory =
            ClientFactory::from_settings(&settings.client).with_timeout(Duration::from_secs(2));
        BiliClient::new(factory, settings.endpoints).expect("client builds")
    }

    /// Upstream success body
    pub fn ok_body(data: Value) -> Value {
        json!({"code": 0, "message": "0", "ttl": 1, "data": data})
    }

    /// A realistic `Master/info` payload
    pub fn master_info_data(uname: &str) -> Value {
        json!({
            "info": {
                "uid": 143474500,
                "uname": uname,
                "face": "https://i0.hdslb.com/bfs/face/member/noface.jpg",
                "official_verify": {"type": -1, "desc": ""},
                "gender": 0
            },
            "exp": {"master_level": {"level": 12, "color": 6067854, "current": [0, 0]}},
            "follower_num": 1024,
            "room_id": 25322725,
            "medal_name": "Medal",
            "glory_count": 0,
            "pendant": "",
            "link_group_num": 0,
            "room_news": {"content": "hello", "ctime": "2024-01-01 00:00:00", "ctime_text": ""}
        })
    }
}
