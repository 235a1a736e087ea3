mod ice;
mod participant;
mod room;
mod signaling;
mod transcript;

pub use ice::{IceCandidate, IceServerConfig};
pub use participant::ParticipantId;
pub use room::{IDLE_ROOM, ROOM_SEPARATOR, RoomId, resolve_room};
pub use signaling::{SdpKind, SessionDescription, SignalMessage};
pub use transcript::{ChatEntry, ChatSender};
