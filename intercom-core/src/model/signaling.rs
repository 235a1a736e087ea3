use crate::model::ice::IceCandidate;
use crate::model::participant::ParticipantId;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Answer,
    Pranswer,
    Rollback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub kind: SdpKind,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Answer,
            sdp: sdp.into(),
        }
    }
}

/// Messages exchanged over the shared signaling topic.
///
/// Every variant is scoped by room and sender so that receivers can drop
/// traffic that belongs to other calls, or that they published themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SignalMessage {
    #[serde(rename_all = "camelCase")]
    Offer {
        sdp: SessionDescription,
        room_id: RoomId,
        sender_id: ParticipantId,
    },
    #[serde(rename_all = "camelCase")]
    Answer {
        sdp: SessionDescription,
        room_id: RoomId,
        sender_id: ParticipantId,
    },
    #[serde(rename_all = "camelCase")]
    Candidate {
        candidate: IceCandidate,
        room_id: RoomId,
        sender_id: ParticipantId,
    },
    #[serde(rename_all = "camelCase")]
    End {
        room_id: RoomId,
        sender_id: ParticipantId,
    },
}

impl SignalMessage {
    pub fn room_id(&self) -> &RoomId {
        match self {
            Self::Offer { room_id, .. }
            | Self::Answer { room_id, .. }
            | Self::Candidate { room_id, .. }
            | Self::End { room_id, .. } => room_id,
        }
    }

    pub fn sender_id(&self) -> &ParticipantId {
        match self {
            Self::Offer { sender_id, .. }
            | Self::Answer { sender_id, .. }
            | Self::Candidate { sender_id, .. }
            | Self::End { sender_id, .. } => sender_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Offer { .. } => "offer",
            Self::Answer { .. } => "answer",
            Self::Candidate { .. } => "candidate",
            Self::End { .. } => "end",
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
