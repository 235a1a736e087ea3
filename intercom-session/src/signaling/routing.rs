use intercom_core::{ParticipantId, RoomId, SignalMessage};

/// What to do with an inbound signal before it reaches the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Addressed to the active room.
    Accept,
    /// The local side is idle and this is the first signal for a room it belongs to.
    Adopt(RoomId),
    /// Self-echo, a foreign room, or a room this participant is not part of.
    Ignore,
}

/// Screen an inbound signal against the local identity and active room.
///
/// The transport fans every message out to every listener, so each side sees
/// its own publishes and the traffic of unrelated calls. An idle side adopts
/// the room of the first signal addressed to a pair it is a member of; this
/// lets the callee answer without having selected the caller first.
///
/// `readoptable` marks an active room that was itself adopted and has no call
/// running in it. Such a room yields to signals for another pair the local
/// side belongs to. `end` never causes an adoption.
pub fn screen(
    self_id: &ParticipantId,
    active_room: &RoomId,
    readoptable: bool,
    message: &SignalMessage,
) -> Verdict {
    if message.sender_id() == self_id {
        return Verdict::Ignore;
    }

    let room = message.room_id();
    if !active_room.is_idle() && room == active_room {
        return Verdict::Accept;
    }

    let adoptable = active_room.is_idle() || readoptable;
    if adoptable
        && !matches!(message, SignalMessage::End { .. })
        && room.includes(self_id)
        && room.includes(message.sender_id())
    {
        return Verdict::Adopt(room.clone());
    }
    Verdict::Ignore
}
