use intercom_core::{ChatEntry, RoomId};
use std::fmt;

use crate::media::{LocalStream, RemoteStream};

/// Where the local side is in establishing a call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    #[default]
    Idle,
    /// Offer published, waiting for the answer.
    Offering,
    /// Answer received, being applied.
    Connecting,
    /// Offer received, answer being produced.
    Answering,
    Active,
}

impl SessionPhase {
    /// Offer/answer exchange has started but not completed.
    pub fn is_negotiating(self) -> bool {
        matches!(
            self,
            SessionPhase::Offering | SessionPhase::Connecting | SessionPhase::Answering
        )
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Offering => "offering",
            SessionPhase::Connecting => "connecting",
            SessionPhase::Answering => "answering",
            SessionPhase::Active => "active",
        };
        f.write_str(name)
    }
}

/// Snapshot of a call session as seen by the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct CallState {
    pub phase: SessionPhase,
    pub room: RoomId,
    pub local_stream: Option<LocalStream>,
    pub remote_stream: Option<RemoteStream>,
    pub in_call: bool,
    pub audio_on: bool,
    pub video_on: bool,
    pub screen_sharing: bool,
    /// Chat transcript, oldest first. Kept across calls.
    pub messages: Vec<ChatEntry>,
    /// The chat data channel is open.
    pub chat_ready: bool,
    /// Last failure from a path with no caller to report to.
    pub last_error: Option<String>,
}

impl Default for CallState {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Idle,
            room: RoomId::idle(),
            local_stream: None,
            remote_stream: None,
            in_call: false,
            audio_on: true,
            video_on: false,
            screen_sharing: false,
            messages: Vec::new(),
            chat_ready: false,
            last_error: None,
        }
    }
}
