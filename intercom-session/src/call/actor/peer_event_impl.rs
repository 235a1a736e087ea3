use intercom_core::SignalMessage;
use tracing::{debug, info, trace};

use crate::call::actor::{CallActor, Teardown};
use crate::call::call_state::SessionPhase;
use crate::peer::{LinkState, PeerEnvelope, PeerEvent};

impl CallActor {
    pub(super) async fn handle_peer_event(&mut self, envelope: PeerEnvelope) {
        let PeerEnvelope { generation, event } = envelope;
        if generation != self.generation || self.session.is_none() {
            trace!("Dropping stale {} event from session {}", event.name(), generation);
            return;
        }

        match event {
            PeerEvent::LocalCandidate(candidate) => {
                self.send_signal(|room_id, sender_id| SignalMessage::Candidate {
                    candidate,
                    room_id,
                    sender_id,
                });
            }

            PeerEvent::DataChannel(link) => {
                debug!("Data channel '{}' received", link.label());
                let open = link.is_open();
                if let Some(session) = self.session.as_mut() {
                    session.chat = Some(link);
                }
                if open {
                    self.state.chat_ready = true;
                    self.publish_state();
                }
            }

            PeerEvent::ChatOpen => {
                self.state.chat_ready = true;
                self.publish_state();
            }

            PeerEvent::ChatMessage(text) => self.on_chat_message(text),

            PeerEvent::RemoteTrack(track) => {
                debug!("Remote {} track {} arrived", track.kind, track.id);
                self.state
                    .remote_stream
                    .get_or_insert_with(Default::default)
                    .add(track);
                self.publish_state();
            }

            PeerEvent::LinkState(state) => match state {
                LinkState::Failed | LinkState::Closed
                    if self.state.phase == SessionPhase::Active =>
                {
                    info!("Peer link {:?} in room {}", state, self.state.room);
                    self.teardown(Teardown::LinkLost).await;
                }
                _ => trace!("Peer link {:?}", state),
            },

            PeerEvent::ShareEnded(track) => self.on_share_ended(track).await,
        }
    }
}
