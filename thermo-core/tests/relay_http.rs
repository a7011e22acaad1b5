use std::{net::SocketAddr, sync::Arc};

use serde_json::{Value, json};
use thermo_core::{
    HttpUpstream, RelayState, Tier, build_router,
    client::{Controller, HttpRelayClient, ResponseView},
};
use tokio::net::TcpListener;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/static");

/// Start a relay in front of `upstream_base` and return its base URL.
async fn spawn_relay(upstream_base: String) -> String {
    let state = RelayState::new(Arc::new(HttpUpstream::new(upstream_base)));
    let app = build_router(state, STATIC_DIR);

    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .expect("bind relay");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("relay server");
    });

    format!("http://{addr}")
}

async fn upstream() -> (MockServer, String) {
    let server = MockServer::start().await;
    let base = format!("{}/api", server.uri());
    (server, base)
}

#[tokio::test]
async fn reading_flows_from_upstream_to_display() {
    let (server, base) = upstream().await;
    Mock::given(method("GET"))
        .and(path("/api/temperature"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "celsius": 21.34,
            "fahrenheit": 70.4,
            "timestamp": "2024-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let relay = spawn_relay(base).await;
    let mut controller = Controller::new(HttpRelayClient::new(relay));

    controller.fetch_temperature().await;

    let ui = controller.state();
    assert_eq!(ui.celsius(), "21.3");
    assert_eq!(ui.fahrenheit(), "70.4");
    assert_eq!(ui.tier(), Some(Tier::Comfortable));
    assert_eq!(ui.celsius_class(), "temp-comfortable");
    assert!(ui.banners().is_empty());
}

#[tokio::test]
async fn upstream_failure_becomes_generic_500_and_banner() {
    let (server, base) = upstream().await;
    Mock::given(method("GET"))
        .and(path("/api/temperature"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Traceback (most recent call last)"))
        .mount(&server)
        .await;

    let relay = spawn_relay(base).await;

    let res = reqwest::get(format!("{relay}/api/temperature"))
        .await
        .expect("relay reachable");
    assert_eq!(res.status().as_u16(), 500);
    let body: Value = res.json().await.expect("json error body");
    assert_eq!(body, json!({"error": "Failed to fetch temperature data"}));

    let mut controller = Controller::new(HttpRelayClient::new(relay));
    controller.fetch_temperature().await;

    let ui = controller.state();
    assert_eq!(ui.celsius(), "--");
    assert_eq!(ui.fahrenheit(), "--");
    assert_eq!(ui.banners().len(), 1);
    assert_eq!(ui.banners()[0].message, "Failed to fetch temperature data");
}

#[tokio::test]
async fn non_json_upstream_body_is_a_failure() {
    let (server, base) = upstream().await;
    Mock::given(method("GET"))
        .and(path("/api/temperature"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let relay = spawn_relay(base).await;

    let res = reqwest::get(format!("{relay}/api/temperature"))
        .await
        .expect("relay reachable");
    assert_eq!(res.status().as_u16(), 500);
}

#[tokio::test]
async fn unreachable_upstream_is_a_failure() {
    // Nothing listens on the discard port.
    let relay = spawn_relay("http://127.0.0.1:9/api".to_string()).await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{relay}/api/ask"))
        .json(&json!({"query": "hi"}))
        .send()
        .await
        .expect("relay reachable");

    assert_eq!(res.status().as_u16(), 500);
    let body: Value = res.json().await.expect("json error body");
    assert_eq!(body, json!({"error": "Failed to get response from LLM"}));
}

#[tokio::test]
async fn question_is_forwarded_and_answer_rendered() {
    let (server, base) = upstream().await;
    Mock::given(method("POST"))
        .and(path("/api/ask"))
        .and(body_json(json!({"query": "hi"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "a<b\n c",
            "temperature": {"celsius": 20.0, "fahrenheit": 68.0, "timestamp": "unknown"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let relay = spawn_relay(base).await;
    let mut controller = Controller::new(HttpRelayClient::new(relay));

    assert!(controller.ask_question("hi").await);

    assert_eq!(controller.state().response_html(), "<div>a&lt;b<br> c</div>");
}

#[tokio::test]
async fn upstream_error_field_is_rendered_as_error() {
    let (server, base) = upstream().await;
    Mock::given(method("POST"))
        .and(path("/api/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "Command timed out after 60 seconds"
        })))
        .mount(&server)
        .await;

    let relay = spawn_relay(base).await;
    let mut controller = Controller::new(HttpRelayClient::new(relay));

    controller.ask_question("is it hot?").await;

    assert_eq!(
        controller.state().response(),
        &ResponseView::Error("Command timed out after 60 seconds".into())
    );
}

#[tokio::test]
async fn empty_error_field_still_renders_response() {
    let (server, base) = upstream().await;
    Mock::given(method("POST"))
        .and(path("/api/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "",
            "response": "hi there"
        })))
        .mount(&server)
        .await;

    let relay = spawn_relay(base).await;
    let mut controller = Controller::new(HttpRelayClient::new(relay));

    controller.ask_question("hello?").await;

    assert_eq!(controller.state().response_html(), "<div>hi there</div>");
}

#[tokio::test]
async fn null_response_renders_fallback_text() {
    let (server, base) = upstream().await;
    Mock::given(method("POST"))
        .and(path("/api/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": null})))
        .mount(&server)
        .await;

    let relay = spawn_relay(base).await;
    let mut controller = Controller::new(HttpRelayClient::new(relay));

    controller.ask_question("hello?").await;

    assert_eq!(
        controller.state().response_html(),
        "<div>No response received.</div>"
    );
}

#[tokio::test]
async fn query_without_content_type_reaches_upstream_as_empty_object() {
    let (server, base) = upstream().await;
    Mock::given(method("POST"))
        .and(path("/api/ask"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let relay = spawn_relay(base).await;

    let res = reqwest::Client::new()
        .post(format!("{relay}/api/ask"))
        .body(r#"{"query": "hi"}"#)
        .send()
        .await
        .expect("relay reachable");

    assert_eq!(res.status().as_u16(), 200);
}

#[tokio::test]
async fn blank_question_never_reaches_upstream() {
    let (server, base) = upstream().await;
    Mock::given(method("POST"))
        .and(path("/api/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "x"})))
        .expect(0)
        .mount(&server)
        .await;

    let relay = spawn_relay(base).await;
    let mut controller = Controller::new(HttpRelayClient::new(relay));

    assert!(!controller.ask_question("   ").await);
    assert_eq!(controller.state().response(), &ResponseView::Empty);
}

#[tokio::test]
async fn relay_serves_ui_assets() {
    let (_server, base) = upstream().await;
    let relay = spawn_relay(base).await;

    let res = reqwest::get(format!("{relay}/index.html"))
        .await
        .expect("relay reachable");
    assert!(res.status().is_success());
    let html = res.text().await.expect("html body");
    assert!(html.contains("response-container"));
}
