mod common;

use axum::{Router, routing::post};
use axum_test::TestServer;
use common::StubProbe;
use link_checker::api::handlers::report_handler;
use serde_json::json;

fn make_server(state: link_checker::AppState) -> TestServer {
    let app = Router::new()
        .route("/api/report", post(report_handler))
        .with_state(state);
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_report_is_pdf() {
    let ctx = common::create_test_state(StubProbe::new()).await;
    let id = common::create_test_set(
        &ctx.repository,
        &["http://link1.com", "http://link2.com"],
        &[("http://link1.com", true), ("http://link2.com", false)],
    )
    .await;
    let server = make_server(ctx.state.clone());

    let response = server
        .post("/api/report")
        .json(&json!({ "links_list": [id] }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/pdf");

    let body = String::from_utf8_lossy(response.as_bytes()).into_owned();
    assert!(body.starts_with("%PDF-1.4"));
    assert!(body.contains(&format!("(Set {id} - created: ")));
    assert!(body.contains("(http://link1.com - available)"));
    assert!(body.contains("(http://link2.com - not available)"));
}

#[tokio::test]
async fn test_report_keeps_requested_order() {
    let ctx = common::create_test_state(StubProbe::new()).await;
    let first = common::create_test_set(&ctx.repository, &["https://a.com"], &[]).await;
    let second = common::create_test_set(&ctx.repository, &["https://b.com"], &[]).await;
    let server = make_server(ctx.state.clone());

    let response = server
        .post("/api/report")
        .json(&json!({ "links_list": [second, first] }))
        .await;

    response.assert_status_ok();
    let body = String::from_utf8_lossy(response.as_bytes()).into_owned();
    let b = body.find("(https://b.com - unknown)").unwrap();
    let a = body.find("(https://a.com - unknown)").unwrap();
    assert!(b < a);
}

#[tokio::test]
async fn test_report_with_missing_set_fails_entirely() {
    let ctx = common::create_test_state(StubProbe::new()).await;
    let id = common::create_test_set(&ctx.repository, &["https://a.com"], &[]).await;
    let server = make_server(ctx.state.clone());

    let response = server
        .post("/api/report")
        .json(&json!({ "links_list": [id, 999999] }))
        .await;

    response.assert_status_not_found();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(json["error"]["details"]["id"], 999999);
}

#[tokio::test]
async fn test_report_requires_ids() {
    let ctx = common::create_test_state(StubProbe::new()).await;
    let server = make_server(ctx.state.clone());

    let response = server
        .post("/api/report")
        .json(&json!({ "links_list": [] }))
        .await;

    response.assert_status_bad_request();
}
