use intercom_core::{RoomId, SignalMessage};
use tracing::{debug, info, warn};

use crate::call::actor::CallActor;
use crate::call::call_state::SessionPhase;

/// Why a call is being torn down. Decides whether `end` is published and
/// whether the active room survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Teardown {
    /// `end_call` from the local user.
    Local,
    /// The counterpart sent `end`.
    Remote,
    /// A local start failed before anything was published.
    Abort,
    /// Negotiation failed after the counterpart had been contacted.
    Failed,
    /// A newer session replaces this one (offer glare, counterpart change).
    Superseded,
    Timeout,
    /// The peer connection failed or closed underneath an active call.
    LinkLost,
    /// The facade is going away.
    Shutdown,
}

impl Teardown {
    fn publishes_end(self) -> bool {
        matches!(
            self,
            Teardown::Local | Teardown::Failed | Teardown::Timeout | Teardown::Shutdown
        )
    }

    fn resets_room(self) -> bool {
        matches!(self, Teardown::Local | Teardown::Shutdown)
    }
}

impl CallActor {
    pub(super) fn has_activity(&self) -> bool {
        self.session.is_some() || self.state.local_stream.is_some() || self.state.in_call
    }

    /// Release everything belonging to the current call. Safe to run at any
    /// time; with nothing active it only resets flags.
    pub(super) async fn teardown(&mut self, reason: Teardown) {
        let was_active = self.has_activity();

        if reason.publishes_end() && was_active && !self.state.room.is_idle() {
            self.send_signal(|room_id, sender_id| SignalMessage::End { room_id, sender_id });
        }

        if was_active {
            info!("Ending call in room {} ({:?})", self.state.room, reason);
        }

        // Device handles go first, before anything is awaited
        let session = self.session.take();
        if let Some(stream) = self.state.local_stream.take() {
            stream.stop();
        }
        if let Some(screen) = session.as_ref().and_then(|s| s.screen_track.as_ref()) {
            screen.stop();
        }

        if let Some(session) = session {
            if let Some(chat) = &session.chat {
                if let Err(e) = chat.close().await {
                    debug!("Failed to close data channel: {:?}", e);
                }
            }
            if let Err(e) = session.peer.close().await {
                debug!("Failed to close peer connection: {:?}", e);
            }
        }

        self.pending.clear();
        self.discard_remote_candidates = false;
        self.set_phase(SessionPhase::Idle);
        self.state.remote_stream = None;
        self.state.in_call = false;
        self.state.video_on = false;
        self.state.screen_sharing = false;
        self.state.chat_ready = false;
        // A room this side never chose is only held for the call in it
        let release_adopted = self.room_adopted && reason != Teardown::Superseded;
        if reason.resets_room() || release_adopted {
            self.state.room = RoomId::idle();
            self.room_adopted = false;
        }
        self.publish_state();
    }

    pub(super) async fn handle_negotiation_timeout(&mut self) {
        self.deadline = None;
        if !self.state.phase.is_negotiating() {
            return;
        }

        warn!(
            "Negotiation in room {} timed out while {}",
            self.state.room, self.state.phase
        );
        self.teardown(Teardown::Timeout).await;
        self.state.last_error = Some("negotiation timed out".to_owned());
        self.publish_state();
    }
}
