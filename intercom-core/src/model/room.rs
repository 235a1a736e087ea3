use crate::model::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel room used while no counterpart is selected.
pub const IDLE_ROOM: &str = "idle";

/// Joins the two participant ids of a room. Not expected inside identifiers.
pub const ROOM_SEPARATOR: char = '|';

/// Logical pairing scope carried by every signaling message.
///
/// All signaling shares one broadcast topic, so the room id is what keeps
/// concurrent calls apart. Both sides derive it independently from the
/// participant pair, which makes it identical regardless of who dials.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn idle() -> Self {
        Self(IDLE_ROOM.to_owned())
    }

    /// Room for a participant pair, or the idle sentinel when either side is missing.
    pub fn resolve(self_id: Option<&ParticipantId>, peer_id: Option<&ParticipantId>) -> Self {
        let (Some(a), Some(b)) = (self_id, peer_id) else {
            return Self::idle();
        };
        if a.is_empty() || b.is_empty() {
            return Self::idle();
        }

        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self(format!("{}{}{}", low, ROOM_SEPARATOR, high))
    }

    pub fn is_idle(&self) -> bool {
        self.0 == IDLE_ROOM
    }

    /// Whether `participant` is one of the two members of this room.
    pub fn includes(&self, participant: &ParticipantId) -> bool {
        !self.is_idle()
            && self
                .0
                .split(ROOM_SEPARATOR)
                .any(|member| member == participant.as_str())
    }

    /// The member of this room that is not `participant`.
    pub fn counterpart_of(&self, participant: &ParticipantId) -> Option<ParticipantId> {
        if !self.includes(participant) {
            return None;
        }
        let (a, b) = self.0.split_once(ROOM_SEPARATOR)?;
        let other = if a == participant.as_str() { b } else { a };
        Some(ParticipantId::from(other))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self::idle()
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn resolve_room(self_id: Option<&ParticipantId>, peer_id: Option<&ParticipantId>) -> RoomId {
    RoomId::resolve(self_id, peer_id)
}
