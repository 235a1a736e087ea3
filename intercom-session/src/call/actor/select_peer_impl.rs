use intercom_core::{ParticipantId, RoomId};
use tracing::info;

use crate::call::actor::{CallActor, Teardown};

impl CallActor {
    /// Switch the counterpart. A live call with the previous counterpart is
    /// dropped without notifying it, and the signal subscription is renewed.
    pub(super) async fn select_peer(&mut self, peer: Option<ParticipantId>) -> RoomId {
        let room = RoomId::resolve(Some(&self.self_id), peer.as_ref());
        if room == self.state.room {
            self.room_adopted = false;
            return room;
        }

        if self.has_activity() {
            self.teardown(Teardown::Superseded).await;
        }

        info!("Active room {} -> {}", self.state.room, room);
        self.state.room = room.clone();
        self.room_adopted = false;
        self.pending.clear();
        self.inbound = self.signals.listen();
        self.publish_state();
        room
    }
}
