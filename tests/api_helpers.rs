//! Endpoint helper integration tests
//!
//! Every helper runs against a wiremock upstream over real HTTP.

mod common;

use bililive_api::types::{Diagnostic, Failure};
use common::helpers::{client_for, master_info_data, ok_body};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header_exists, method, path, query_param},
};

#[tokio::test]
async fn test_master_info_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/live_user/v1/Master/info"))
        .and(query_param("uid", "143474500"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(master_info_data("X"))))
        .expect(1)
        .mount(&server)
        .await;

    let envelope = client_for(&server).master_info(143474500).await;
    let json = serde_json::to_value(&envelope).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["error"], Value::Null);
    assert_eq!(json["status_code"], 200);
    assert_eq!(json["api_code"], 0);
    assert_eq!(json["data"]["info"]["uname"], "X");
    assert_eq!(json["data"]["exp"]["master_level"]["level"], 12);
    assert!(json["data"]["info"].get("gender").is_none());
    assert!(json["data"].get("glory_count").is_none());
}

#[tokio::test]
async fn test_upstream_error_code() {
    let server = MockServer::start().await;
    Mock::given(path("/live_user/v1/Master/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": -400, "message": "M", "msg": "short", "data": null
        })))
        .mount(&server)
        .await;

    let envelope = client_for(&server).master_info(1).await;

    assert!(!envelope.is_success());
    assert!(envelope.data().is_none());
    assert_eq!(envelope.error().as_deref(), Some("M"));
    assert_eq!(envelope.api_code(), Some(-400));
    assert_eq!(envelope.status_code(), Some(200));

    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(json["response_data"]["code"], -400);
}

#[tokio::test]
async fn test_upstream_error_without_message() {
    let server = MockServer::start().await;
    Mock::given(path("/room/v1/Area/getList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 1})))
        .mount(&server)
        .await;

    let envelope = client_for(&server).area_list().await;
    assert_eq!(envelope.error().as_deref(), Some("unknown error"));
}

#[rstest]
#[case(404)]
#[case(412)]
#[case(500)]
#[tokio::test]
async fn test_http_status_failure(#[case] status: u16) {
    let server = MockServer::start().await;
    Mock::given(path("/x/web-frontend/getbuvid"))
        .respond_with(ResponseTemplate::new(status).set_body_string("blocked"))
        .mount(&server)
        .await;

    let envelope = client_for(&server).fetch_buvid3().await;

    assert!(!envelope.is_success());
    assert_eq!(envelope.status_code(), Some(status));
    assert!(envelope.error().unwrap().contains(&status.to_string()));
    assert_eq!(
        envelope.diagnostic(),
        Some(&Diagnostic::ResponseText("blocked".to_string()))
    );
}

#[tokio::test]
async fn test_timeout() {
    let server = MockServer::start().await;
    Mock::given(path("/room/v1/Area/getList"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_body(json!([])))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let envelope = client_for(&server).area_list().await;

    assert_eq!(envelope.failure(), Some(&Failure::Timeout));
    assert_eq!(envelope.status_code(), None);
    assert!(envelope.error().unwrap().contains("timed out"));
}

#[tokio::test]
async fn test_identical_responses_give_identical_envelopes() {
    let server = MockServer::start().await;
    Mock::given(path("/room/v1/Area/getMyChooseArea"))
        .and(query_param("roomid", "25322725"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!([
            {"id": "371", "name": "Virtual", "parent_id": "9", "parent_name": "VTuber", "act_flag": 0}
        ]))))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = serde_json::to_vec(&client.anchor_common_areas(25322725).await).unwrap();
    let second = serde_json::to_vec(&client.anchor_common_areas(25322725).await).unwrap();

    assert_eq!(first, second);
    let json: Value = serde_json::from_slice(&first).unwrap();
    assert_eq!(
        json["data"],
        json!([{"id": 371, "name": "Virtual", "parent_id": 9, "parent_name": "VTuber"}])
    );
}

#[tokio::test]
async fn test_common_areas_incomplete_entry() {
    let server = MockServer::start().await;
    Mock::given(path("/room/v1/Area/getMyChooseArea"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!([
            {"id": 1, "name": "a", "parent_id": 2}
        ]))))
        .mount(&server)
        .await;

    let envelope = client_for(&server).anchor_common_areas(7).await;

    assert_eq!(envelope.failure().map(Failure::kind), Some("response_shape"));
    assert!(envelope.error().unwrap().contains("data[0]"));
    assert!(matches!(envelope.diagnostic(), Some(Diagnostic::ResponseData(_))));
}

#[tokio::test]
async fn test_buvid_cookies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<!DOCTYPE html>")
                .append_header("set-cookie", "buvid3=B3-infoc; path=/; domain=.bilibili.com")
                .append_header("set-cookie", "b_nut=1700000000; path=/; domain=.bilibili.com"),
        )
        .mount(&server)
        .await;

    let envelope = client_for(&server).fetch_buvid3_and_bnut().await;
    let data = envelope.data().expect("cookies present");

    assert_eq!(data.buvid3, "B3-infoc");
    assert_eq!(data.b_nut, "1700000000");
    assert_eq!(data.to_cookie_string(), "buvid3=B3-infoc; b_nut=1700000000");
}

#[tokio::test]
async fn test_buvid_cookies_missing() {
    let server = MockServer::start().await;
    Mock::given(path("/"))
        .respond_with(ResponseTemplate::new(200).append_header("set-cookie", "other=1; path=/"))
        .mount(&server)
        .await;

    let envelope = client_for(&server).fetch_buvid3_and_bnut().await;

    assert!(!envelope.is_success());
    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(json["available_cookies"], json!(["other"]));
    assert!(json["error"].as_str().unwrap().contains("buvid3, b_nut"));
}

#[tokio::test]
async fn test_buvid_pair() {
    let server = MockServer::start().await;
    Mock::given(path("/x/frontend/finger/spi"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_body(json!({"b_3": "X-infoc", "b_4": "Y-infoc"}))),
        )
        .mount(&server)
        .await;

    let envelope = client_for(&server).fetch_buvid_pair().await;
    assert_eq!(envelope.data().map(|pair| pair.b_4.as_str()), Some("Y-infoc"));
}

#[tokio::test]
async fn test_buvid3_missing_field() {
    let server = MockServer::start().await;
    Mock::given(path("/x/web-frontend/getbuvid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({}))))
        .mount(&server)
        .await;

    let envelope = client_for(&server).fetch_buvid3().await;
    assert_eq!(
        envelope.failure(),
        Some(&Failure::shape("data.buvid", "field is absent or null"))
    );
    assert_eq!(envelope.api_code(), Some(0));
}

#[tokio::test]
async fn test_room_info_old_and_base_info() {
    let server = MockServer::start().await;
    Mock::given(path("/room/v1/Room/getRoomInfoOld"))
        .and(query_param("mid", "143474500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "roomStatus": 1, "roundStatus": 0, "liveStatus": 0,
            "url": "https://live.bilibili.com/25322725", "title": "t",
            "roomid": 25322725, "broadcast_type": 0, "online_hidden": 0,
            "link": "https://live.bilibili.com/25322725"
        }))))
        .mount(&server)
        .await;
    Mock::given(path("/xlive/web-room/v1/index/getRoomBaseInfo"))
        .and(query_param("room_ids", "25322725"))
        .and(query_param("req_biz", "web_room_componet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "by_room_ids": {"25322725": {
                "room_id": 25322725, "uid": 143474500, "area_id": 371,
                "live_status": 0, "title": "t", "parent_area_name": "VTuber",
                "area_name": "Virtual", "uname": "X"
            }}
        }))))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let room = client.room_info_old(143474500).await.into_result().unwrap();
    assert_eq!(room.roomid, Some(25322725));
    assert!(!room.is_live());

    let base = client.room_base_info(25322725).await.into_result().unwrap();
    assert_eq!(base.uid, 143474500);
    assert_eq!(base.area_name, "Virtual");
}

#[tokio::test]
async fn test_zero_identifiers_skip_network() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    assert_eq!(
        client.master_info(0).await.failure().map(Failure::kind),
        Some("invalid_input")
    );
    assert!(!client.room_base_info(0).await.is_success());

    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}
