mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use common::StubProbe;
use link_checker::api::handlers::get_set_handler;

fn make_server(state: link_checker::AppState) -> TestServer {
    let app = Router::new()
        .route("/api/sets/{id}", get(get_set_handler))
        .with_state(state);
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_get_set_with_results() {
    let ctx = common::create_test_state(StubProbe::new()).await;
    let id = common::create_test_set(
        &ctx.repository,
        &["https://a.com", "https://b.com", "https://a.com"],
        &[("https://a.com", true)],
    )
    .await;
    let server = make_server(ctx.state.clone());

    let response = server.get(&format!("/api/sets/{id}")).await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["id"], id);
    assert_eq!(json["status"], "processing");
    assert_eq!(json["links"].as_array().unwrap().len(), 3);

    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["url"], "https://a.com");
    assert_eq!(results[0]["state"], "available");
    assert_eq!(results[0]["detail"], "ok");
    assert!(results[0]["checked_at"].is_string());
    assert_eq!(results[1]["state"], "unknown");
    assert!(results[1].get("checked_at").is_none());
}

#[tokio::test]
async fn test_get_done_set() {
    let ctx = common::create_test_state(StubProbe::new()).await;
    let id = common::create_test_set(&ctx.repository, &["https://a.com"], &[("https://a.com", false)]).await;
    let server = make_server(ctx.state.clone());

    let response = server.get(&format!("/api/sets/{id}")).await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "done");
    assert_eq!(json["results"][0]["label"], "not available");
}

#[tokio::test]
async fn test_get_missing_set() {
    let ctx = common::create_test_state(StubProbe::new()).await;
    let server = make_server(ctx.state.clone());

    let response = server.get("/api/sets/42").await;

    response.assert_status_not_found();
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "not_found"
    );
}

#[tokio::test]
async fn test_get_set_invalid_id() {
    let ctx = common::create_test_state(StubProbe::new()).await;
    let server = make_server(ctx.state.clone());

    let response = server.get("/api/sets/abc").await;

    response.assert_status_bad_request();
}
