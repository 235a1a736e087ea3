use intercom_core::IceCandidate;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::trace;

use crate::media::{LocalTrack, RemoteTrack};
use crate::peer::chat_link::ChatLink;

/// Connection-level state reported by the peer transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connected,
    Disconnected,
    Failed,
    Closed,
    Other,
}

/// Events raised by a peer session and delivered to the call actor.
pub enum PeerEvent {
    /// A local ICE candidate to trickle to the counterpart.
    LocalCandidate(IceCandidate),
    /// The counterpart opened a data channel.
    DataChannel(Arc<dyn ChatLink>),
    ChatOpen,
    ChatMessage(String),
    RemoteTrack(RemoteTrack),
    LinkState(LinkState),
    /// A screen-share track ended, possibly outside of our control.
    ShareEnded(LocalTrack),
}

impl PeerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PeerEvent::LocalCandidate(_) => "local-candidate",
            PeerEvent::DataChannel(_) => "data-channel",
            PeerEvent::ChatOpen => "chat-open",
            PeerEvent::ChatMessage(_) => "chat-message",
            PeerEvent::RemoteTrack(_) => "remote-track",
            PeerEvent::LinkState(_) => "link-state",
            PeerEvent::ShareEnded(_) => "share-ended",
        }
    }
}

/// A [`PeerEvent`] stamped with the session generation that produced it.
pub struct PeerEnvelope {
    pub generation: u64,
    pub event: PeerEvent,
}

/// Handle given to a peer session for reporting its events.
///
/// Events carry the generation of the session the sink was created for, so
/// anything still in flight after that session closes is recognisably stale.
#[derive(Clone)]
pub struct PeerEventSink {
    generation: u64,
    tx: mpsc::UnboundedSender<PeerEnvelope>,
}

impl PeerEventSink {
    pub fn new(generation: u64, tx: mpsc::UnboundedSender<PeerEnvelope>) -> Self {
        Self { generation, tx }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Never blocks, so it is safe to call from transport callbacks.
    pub fn emit(&self, event: PeerEvent) {
        let name = event.name();
        if self
            .tx
            .send(PeerEnvelope {
                generation: self.generation,
                event,
            })
            .is_err()
        {
            trace!("Call actor gone, dropping {} event", name);
        }
    }
}
