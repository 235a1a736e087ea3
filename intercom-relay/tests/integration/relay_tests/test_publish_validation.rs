use crate::integration::init_tracing;
use crate::utils::TestRelay;

#[tokio::test]
async fn test_invalid_json_is_rejected() {
    init_tracing();

    let relay = TestRelay::start().await;
    let mut stream = relay.open_stream().await;
    stream.next_event().await;

    let response = relay.post("{not json").await;
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], false);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));

    // Nothing was fanned out; the next event is the valid publish below
    relay.post(r#"{"type":"end","roomId":"r","senderId":"s"}"#).await;
    let event = stream.next_non_ping().await;
    assert!(event.data.contains("\"end\""));
}

#[tokio::test]
async fn test_any_json_document_is_relayed() {
    init_tracing();

    let relay = TestRelay::start().await;
    let mut stream = relay.open_stream().await;
    stream.next_event().await;

    // The relay does not interpret payloads
    let response = relay.post(r#"{"hello":"world"}"#).await;
    assert_eq!(response.status(), 200);

    let event = stream.next_non_ping().await;
    assert_eq!(event.data, r#"{"hello":"world"}"#);
}

#[tokio::test]
async fn test_publish_answers_cors_preflight() {
    init_tracing();

    let relay = TestRelay::start().await;
    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, relay.endpoint())
        .header("origin", "http://example.org")
        .header("access-control-request-method", "POST")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
