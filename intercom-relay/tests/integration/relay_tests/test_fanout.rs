use std::time::Duration;

use crate::integration::init_tracing;
use crate::utils::TestRelay;

#[tokio::test]
async fn test_stream_opens_with_open_event() {
    init_tracing();

    let relay = TestRelay::start().await;
    let mut stream = relay.open_stream().await;

    let open = stream.next_event().await;
    assert_eq!(open.event.as_deref(), Some("open"));
    assert_eq!(open.data, "\"ok\"");
}

#[tokio::test]
async fn test_publish_reaches_every_subscriber() {
    init_tracing();

    let relay = TestRelay::start().await;
    let mut first = relay.open_stream().await;
    let mut second = relay.open_stream().await;
    first.next_event().await;
    second.next_event().await;

    let response = relay
        .post(r#"{"type":"end","roomId":"a@x|b@x","senderId":"a@x"}"#)
        .await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "ok": true }));

    for stream in [&mut first, &mut second] {
        let event = stream.next_non_ping().await;
        assert_eq!(event.event, None);
        let value: serde_json::Value = serde_json::from_str(&event.data).unwrap();
        assert_eq!(value["type"], "end");
        assert_eq!(value["roomId"], "a@x|b@x");
    }
}

#[tokio::test]
async fn test_payloads_keep_publish_order() {
    init_tracing();

    let relay = TestRelay::start().await;
    let mut stream = relay.open_stream().await;
    stream.next_event().await;

    for n in 0..5 {
        relay.post(&format!("{{\"n\":{}}}", n)).await;
    }
    for n in 0..5 {
        let event = stream.next_non_ping().await;
        assert_eq!(event.data, format!("{{\"n\":{}}}", n));
    }
}

#[tokio::test]
async fn test_multiline_json_arrives_on_one_line() {
    init_tracing();

    let relay = TestRelay::start().await;
    let mut stream = relay.open_stream().await;
    stream.next_event().await;

    relay.post("{\n  \"type\": \"end\",\n  \"roomId\": \"r\"\n}").await;
    let event = stream.next_non_ping().await;
    assert!(!event.data.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&event.data).unwrap();
    assert_eq!(value, serde_json::json!({ "type": "end", "roomId": "r" }));
}

#[tokio::test]
async fn test_keep_alive_pings() {
    init_tracing();

    let relay = TestRelay::start_with_keep_alive(Duration::from_millis(100)).await;
    let mut stream = relay.open_stream().await;
    stream.next_event().await;

    let ping = stream.next_event().await;
    assert_eq!(ping.event.as_deref(), Some("ping"));
    assert!(ping.data.parse::<i64>().is_ok());
}

#[tokio::test]
async fn test_closed_stream_is_unregistered() {
    init_tracing();

    // Pings make the relay notice the dropped connection
    let relay = TestRelay::start_with_keep_alive(Duration::from_millis(50)).await;
    let stream = relay.open_stream().await;
    let _other = relay.open_stream().await;
    assert_eq!(relay.hub.subscriber_count(), 2);

    drop(stream);
    relay.wait_for_subscribers(1).await;
}
