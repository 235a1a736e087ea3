use intercom_session::{CallError, CallFailure, LocalBus, MediaError, SessionPhase};
use std::sync::Arc;

use crate::integration::init_tracing;
use crate::utils::{
    BusProbe, DeniedDevices, MockNetwork, MockPeerFactory, TestParty, spawn_session, test_config,
};

#[tokio::test]
async fn test_denied_media_leaves_session_idle() {
    init_tracing();

    let bus = LocalBus::new();
    let network = MockNetwork::new();
    let peers = MockPeerFactory::new(network.clone());
    let session = spawn_session(&bus, "a@x", test_config(), Arc::new(DeniedDevices), peers.clone()).await;
    session.select_peer(Some("b@x".into())).await.unwrap();

    let mut probe = BusProbe::attach(&bus).await;
    let err = session.start_call().await.unwrap_err();
    assert!(
        err.to_string().starts_with("unable to start call"),
        "unexpected error: {}",
        err
    );
    assert!(matches!(
        err,
        CallError::Start(CallFailure::Media(MediaError::PermissionDenied))
    ));

    let state = session.state();
    assert_eq!(state.phase, SessionPhase::Idle);
    assert!(!state.in_call);
    assert!(state.local_stream.is_none());
    assert_eq!(state.room.as_str(), "a@x|b@x");
    assert_eq!(peers.created_count(), 0);

    probe.expect_none("offer", 300).await;
}

#[tokio::test]
async fn test_start_requires_counterpart() {
    init_tracing();

    let bus = LocalBus::new();
    let network = MockNetwork::new();
    let alice = TestParty::join(&bus, &network, "a@x").await;

    let err = alice.session.start_call().await.unwrap_err();
    assert!(matches!(err, CallError::NoCounterpart));
    assert_eq!(alice.state().phase, SessionPhase::Idle);
    assert!(alice.devices.user_streams().is_empty());
}

#[tokio::test]
async fn test_second_start_is_rejected() {
    init_tracing();

    let bus = LocalBus::new();
    let network = MockNetwork::new();
    let alice = TestParty::join(&bus, &network, "a@x").await;
    alice.select(&bus, "b@x").await;

    alice.session.start_call().await.unwrap();
    let err = alice.session.start_call().await.unwrap_err();
    assert!(matches!(err, CallError::CallInProgress));

    // The first attempt is untouched
    assert_eq!(alice.state().phase, SessionPhase::Offering);
    assert_eq!(alice.peers.created_count(), 1);
    assert!(!alice.peers.last().unwrap().is_closed());
}

#[tokio::test]
async fn test_operations_after_close_fail() {
    init_tracing();

    let bus = LocalBus::new();
    let network = MockNetwork::new();
    let alice = TestParty::join(&bus, &network, "a@x").await;
    let handle = alice.session.clone();
    alice.session.close().await;

    assert!(matches!(handle.start_call().await, Err(CallError::Closed)));
    assert!(matches!(handle.toggle_audio().await, Err(CallError::Closed)));
    assert!(matches!(
        handle.send_message("hi").await,
        Err(CallError::Closed)
    ));
    assert!(matches!(
        handle.select_peer(None).await,
        Err(CallError::Closed)
    ));
}

#[tokio::test]
async fn test_failed_peer_setup_restores_flags() {
    init_tracing();

    let bus = LocalBus::new();
    let network = MockNetwork::new();
    let alice = TestParty::join(&bus, &network, "a@x").await;
    alice.select(&bus, "b@x").await;

    // Leave the microphone muted from an earlier call
    alice.session.start_call().await.unwrap();
    assert!(!alice.session.toggle_audio().await.unwrap());
    alice.session.end_call().await.unwrap();
    alice.select(&bus, "b@x").await;

    let before = alice.state();
    assert!(!before.audio_on);
    assert!(!before.video_on);

    alice.peers.set_failing(true);
    let err = alice.session.start_call().await.unwrap_err();
    assert!(matches!(err, CallError::Start(_)), "unexpected error: {}", err);

    let state = alice.state();
    assert_eq!(state.phase, SessionPhase::Idle);
    assert_eq!(state.audio_on, before.audio_on);
    assert_eq!(state.video_on, before.video_on);
    assert_eq!(state.last_error, before.last_error);
    assert!(!state.in_call);
    assert!(state.local_stream.is_none());
    assert_eq!(state.room.as_str(), "a@x|b@x");

    // The capture made for the attempt is released
    let attempt = alice.devices.user_streams().pop().unwrap();
    assert!(attempt.tracks.iter().all(|t| !t.is_live()));
}
