//! Integration tests for intercom-session.
//!
//! Tests are organized by functionality:
//! - `signaling_tests` - room routing and candidate buffering
//! - `lifecycle_tests` - call setup, teardown and negotiation edge cases
//! - `media_tests` - mute, camera and screen share
//! - `rtc_tests` - negotiation over real webrtc peer connections


use intercom_session::{
    IceCandidate, ParticipantId, RoomId, SessionDescription, SignalMessage,
};
use tracing::Level;

/// Initialize tracing for tests (call once per test).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn offer_from(sender: &str, room: &str, sdp: &str) -> SignalMessage {
    SignalMessage::Offer {
        sdp: SessionDescription::offer(sdp),
        room_id: RoomId::from(room),
        sender_id: ParticipantId::from(sender),
    }
}

pub fn answer_from(sender: &str, room: &str, sdp: &str) -> SignalMessage {
    SignalMessage::Answer {
        sdp: SessionDescription::answer(sdp),
        room_id: RoomId::from(room),
        sender_id: ParticipantId::from(sender),
    }
}

pub fn candidate_from(sender: &str, room: &str, candidate: &str) -> SignalMessage {
    SignalMessage::Candidate {
        candidate: IceCandidate::new(candidate),
        room_id: RoomId::from(room),
        sender_id: ParticipantId::from(sender),
    }
}

pub fn end_from(sender: &str, room: &str) -> SignalMessage {
    SignalMessage::End {
        room_id: RoomId::from(room),
        sender_id: ParticipantId::from(sender),
    }
}
