use futures::FutureExt;
use intercom_session::{
    CallSession, ParticipantId, RelayTransport, RoomId, SessionConfig, SessionPhase,
    SignalMessage, SignalTransport,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::integration::init_tracing;
use crate::utils::TestRelay;

fn end_from(sender: &str) -> SignalMessage {
    SignalMessage::End {
        room_id: RoomId::from("a@x|b@x"),
        sender_id: ParticipantId::from(sender),
    }
}

#[tokio::test]
async fn test_relay_transport_round_trip() {
    init_tracing();

    let relay = TestRelay::start().await;
    let transport = RelayTransport::new(&relay.base_url());

    let (tx, mut rx) = mpsc::channel(8);
    let listener = transport.clone();
    let subscription = tokio::spawn(async move { listener.subscribe(tx).await });
    relay.wait_for_subscribers(1).await;

    transport.publish(&end_from("a@x")).await.unwrap();
    let received = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(received, end_from("a@x"));

    // The open event was housekeeping and never surfaced
    assert!(rx.recv().now_or_never().is_none());

    drop(rx);
    transport.publish(&end_from("b@x")).await.unwrap();
    let result = tokio::time::timeout(Duration::from_secs(5), subscription)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_publish_to_missing_relay_fails() {
    init_tracing();

    let relay = TestRelay::start().await;
    let base_url = relay.base_url();
    drop(relay);
    tokio::time::sleep(Duration::from_millis(100)).await;

    let transport = RelayTransport::new(&base_url);
    assert!(transport.publish(&end_from("a@x")).await.is_err());
}

#[tokio::test]
async fn test_sessions_reach_each_other_through_relay() {
    init_tracing();

    // Short pings so replaced subscriptions are pruned quickly
    let relay = TestRelay::start_with_keep_alive(Duration::from_millis(50)).await;
    let config = SessionConfig {
        stun_urls: Vec::new(),
        negotiation_timeout_ms: 10_000,
        resubscribe_delay_ms: 50,
        ..Default::default()
    };

    let alice_transport: Arc<dyn SignalTransport> = Arc::new(RelayTransport::new(&relay.base_url()));
    let bob_transport: Arc<dyn SignalTransport> = Arc::new(RelayTransport::new(&relay.base_url()));
    let alice = CallSession::builder("a@x", alice_transport)
        .config(config.clone())
        .spawn();
    let bob = CallSession::builder("b@x", bob_transport)
        .config(config)
        .spawn();
    relay.wait_for_subscribers(2).await;

    alice.select_peer(Some("b@x".into())).await.unwrap();
    // The renewed subscription replaces the old one
    tokio::time::sleep(Duration::from_millis(200)).await;
    relay.wait_for_subscribers(2).await;

    alice.start_call().await.unwrap();

    let mut watch = bob.watch();
    tokio::time::timeout(
        Duration::from_secs(10),
        watch.wait_for(|s| s.phase == SessionPhase::Active),
    )
    .await
    .expect("bob never became active")
    .unwrap();
    assert_eq!(bob.state().room.as_str(), "a@x|b@x");

    let mut watch = alice.watch();
    tokio::time::timeout(
        Duration::from_secs(10),
        watch.wait_for(|s| s.phase == SessionPhase::Active),
    )
    .await
    .expect("alice never became active")
    .unwrap();

    alice.close().await;
    bob.close().await;
}
