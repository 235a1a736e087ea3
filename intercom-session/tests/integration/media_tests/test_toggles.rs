use intercom_session::{LocalBus, SessionPhase};

use crate::integration::init_tracing;
use crate::utils::{MockNetwork, TestParty, wait_for_state};

#[tokio::test]
async fn test_toggles_without_media_report_current_flags() {
    init_tracing();

    let bus = LocalBus::new();
    let network = MockNetwork::new();
    let alice = TestParty::join(&bus, &network, "a@x").await;

    let before = alice.state();
    assert!(alice.session.toggle_audio().await.unwrap());
    assert!(!alice.session.toggle_video().await.unwrap());
    assert_eq!(alice.state(), before);
}

#[tokio::test]
async fn test_toggles_flip_track_enablement() {
    init_tracing();

    let bus = LocalBus::new();
    let network = MockNetwork::new();
    let alice = TestParty::join(&bus, &network, "a@x").await;
    let bob = TestParty::join(&bus, &network, "b@x").await;
    alice.select(&bus, "b@x").await;

    alice.session.start_call().await.unwrap();
    wait_for_state(&bob.session, "bob active", |s| s.phase == SessionPhase::Active).await;
    let stream = alice.state().local_stream.unwrap();

    assert!(!alice.session.toggle_audio().await.unwrap());
    assert!(!alice.state().audio_on);
    assert!(stream.audio_tracks().all(|t| !t.is_enabled()));
    assert!(stream.video_tracks().all(|t| t.is_enabled()));

    assert!(!alice.session.toggle_video().await.unwrap());
    assert!(!alice.state().video_on);
    assert!(stream.video_tracks().all(|t| !t.is_enabled()));

    assert!(alice.session.toggle_audio().await.unwrap());
    assert!(alice.session.toggle_video().await.unwrap());
    assert!(stream.tracks.iter().all(|t| t.is_enabled()));

    // Muting keeps the tracks attached
    assert!(stream.tracks.iter().all(|t| t.is_live()));
}

#[tokio::test]
async fn test_new_call_starts_unmuted() {
    init_tracing();

    let bus = LocalBus::new();
    let network = MockNetwork::new();
    let alice = TestParty::join(&bus, &network, "a@x").await;
    let bob = TestParty::join(&bus, &network, "b@x").await;
    alice.select(&bus, "b@x").await;

    alice.session.start_call().await.unwrap();
    wait_for_state(&bob.session, "bob active", |s| s.phase == SessionPhase::Active).await;
    alice.session.toggle_audio().await.unwrap();
    alice.session.toggle_video().await.unwrap();

    bob.session.end_call().await.unwrap();
    wait_for_state(&alice.session, "alice idle", |s| !s.in_call).await;

    alice.session.start_call().await.unwrap();
    let state = alice.state();
    assert!(state.audio_on);
    assert!(state.video_on);
    let stream = state.local_stream.unwrap();
    assert!(stream.tracks.iter().all(|t| t.is_enabled()));
}
