mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use helpers::{body_json, json_request, make_test_app};
use util::config::AppConfig;

#[tokio::test]
async fn enroll_hands_out_sequential_ids() {
    let (app, _state) = make_test_app().await;

    let resp = app
        .clone()
        .oneshot(json_request("POST", "/enroll", json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let first = body_json(resp).await;
    assert_eq!(first["success"], true);
    let first_id = first["fingerprintId"].as_i64().unwrap();

    let resp = app
        .oneshot(json_request("POST", "/enroll", json!({})))
        .await
        .unwrap();
    let second = body_json(resp).await;
    assert_eq!(second["fingerprintId"].as_i64().unwrap(), first_id + 1);
}

#[tokio::test]
async fn proxy_enroll_surfaces_sensor_network_failures() {
    helpers::app::ensure_test_env();
    let (app, _state) = make_test_app().await;

    // nothing listens on the discard port; the relay must fail cleanly
    AppConfig::set_sensor_host("127.0.0.1");
    AppConfig::set_sensor_port(9);

    let resp = app
        .oneshot(json_request("POST", "/proxy/enroll?role=student", json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp).await;
    assert!(body["message"].as_str().is_some());
}
