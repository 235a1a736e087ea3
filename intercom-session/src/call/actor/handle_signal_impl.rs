use intercom_core::{IceCandidate, ParticipantId, SessionDescription, SignalMessage};
use tracing::{debug, info, trace, warn};

use crate::call::actor::{CallActor, Teardown};
use crate::call::call_state::SessionPhase;
use crate::signaling::{Verdict, screen};

impl CallActor {
    pub(super) async fn handle_signal(&mut self, msg: SignalMessage) {
        let readoptable = self.room_adopted && !self.has_activity();
        match screen(&self.self_id, &self.state.room, readoptable, &msg) {
            Verdict::Ignore => {
                trace!(
                    "Ignoring {} from {} for room {}",
                    msg.kind(),
                    msg.sender_id(),
                    msg.room_id()
                );
                return;
            }
            Verdict::Adopt(room) => {
                info!("Adopting room {} from {}", room, msg.sender_id());
                if self.room_adopted {
                    self.pending.clear();
                }
                self.state.room = room;
                self.room_adopted = true;
                self.publish_state();
            }
            Verdict::Accept => {}
        }

        debug!("Received {} from {}", msg.kind(), msg.sender_id());

        match msg {
            SignalMessage::Offer { sdp, sender_id, .. } => self.on_offer(sdp, sender_id).await,
            SignalMessage::Answer { sdp, .. } => self.on_answer(sdp).await,
            SignalMessage::Candidate { candidate, .. } => self.on_remote_candidate(candidate).await,
            SignalMessage::End { sender_id, .. } => {
                info!("Call ended by {}", sender_id);
                self.teardown(Teardown::Remote).await;
            }
        }
    }

    async fn on_offer(&mut self, offer: SessionDescription, sender: ParticipantId) {
        match self.state.phase {
            SessionPhase::Idle => self.accept_offer(offer).await,

            // Both sides dialled at once. The side whose id sorts lower yields.
            SessionPhase::Offering => {
                if self.self_id < sender {
                    info!("Offer collision with {}, yielding", sender);
                    self.teardown(Teardown::Superseded).await;
                    self.accept_offer(offer).await;
                } else {
                    debug!("Offer collision with {}, keeping own offer", sender);
                    // Candidates up to the answer belong to the abandoned offer
                    self.pending.clear();
                    self.discard_remote_candidates = true;
                }
            }

            SessionPhase::Connecting | SessionPhase::Answering | SessionPhase::Active => {
                warn!(
                    "Ignoring offer from {} while {} in room {}",
                    sender, self.state.phase, self.state.room
                );
            }
        }
    }

    async fn on_answer(&mut self, answer: SessionDescription) {
        if self.state.phase != SessionPhase::Offering {
            debug!("Ignoring answer while {}", self.state.phase);
            return;
        }
        self.discard_remote_candidates = false;
        self.accept_answer(answer).await;
    }

    async fn on_remote_candidate(&mut self, candidate: IceCandidate) {
        if self.discard_remote_candidates {
            trace!("Dropping candidate for a turned-down offer");
            return;
        }

        let peer = match &self.session {
            Some(session) if session.remote_applied => session.peer.clone(),
            _ => {
                self.pending.push(candidate);
                trace!("Buffered remote candidate ({} pending)", self.pending.len());
                return;
            }
        };

        if let Err(e) = peer.add_ice_candidate(&candidate).await {
            debug!("Failed to apply remote candidate: {:?}", e);
        }
    }
}
