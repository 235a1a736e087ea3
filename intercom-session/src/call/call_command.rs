use intercom_core::{ParticipantId, RoomId};
use tokio::sync::oneshot;

use crate::error::CallError;

/// Requests from [`crate::CallSession`] to its actor. Each carries a reply slot.
pub(crate) enum CallCommand {
    /// Pick (or clear) the counterpart. Replies with the resulting room.
    SelectPeer {
        peer: Option<ParticipantId>,
        reply: oneshot::Sender<RoomId>,
    },
    StartCall {
        reply: oneshot::Sender<Result<(), CallError>>,
    },
    EndCall {
        reply: oneshot::Sender<()>,
    },
    /// Replies with the new audio flag.
    ToggleAudio {
        reply: oneshot::Sender<bool>,
    },
    /// Replies with the new video flag.
    ToggleVideo {
        reply: oneshot::Sender<bool>,
    },
    StartScreenShare {
        reply: oneshot::Sender<Result<(), CallError>>,
    },
    StopScreenShare {
        reply: oneshot::Sender<()>,
    },
    SendMessage {
        text: String,
        reply: oneshot::Sender<()>,
    },
    /// Full teardown, then the actor exits.
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}
