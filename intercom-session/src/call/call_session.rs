use intercom_core::{ParticipantId, RoomId};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

use crate::call::actor::{ActorParts, CallActor};
use crate::call::call_command::CallCommand;
use crate::call::call_state::CallState;
use crate::config::SessionConfig;
use crate::error::CallError;
use crate::media::{MediaDevices, SampleDevices};
use crate::peer::{PeerFactory, RtcPeerFactory};
use crate::signaling::{SignalChannel, SignalTransport};

const COMMAND_CAPACITY: usize = 32;

/// Handle to a running call session.
///
/// Every operation is forwarded to a background actor that owns the peer
/// connection, the media and the signal subscription. Clones drive the same
/// session. When the last clone is dropped, the session tears itself down
/// exactly as [`CallSession::close`] would.
#[derive(Clone)]
pub struct CallSession {
    self_id: ParticipantId,
    command_tx: mpsc::Sender<CallCommand>,
    state_rx: watch::Receiver<CallState>,
}

pub struct CallSessionBuilder {
    self_id: ParticipantId,
    transport: Arc<dyn SignalTransport>,
    config: SessionConfig,
    devices: Arc<dyn MediaDevices>,
    peer_factory: Arc<dyn PeerFactory>,
}

impl CallSessionBuilder {
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn devices(mut self, devices: Arc<dyn MediaDevices>) -> Self {
        self.devices = devices;
        self
    }

    pub fn peer_factory(mut self, peer_factory: Arc<dyn PeerFactory>) -> Self {
        self.peer_factory = peer_factory;
        self
    }

    /// Start the session actor. Must be called inside a tokio runtime.
    pub fn spawn(self) -> CallSession {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (state_tx, state_rx) = watch::channel(CallState::default());

        let signals = SignalChannel::open(self.transport, self.config.resubscribe_delay());
        let parts = ActorParts {
            self_id: self.self_id.clone(),
            config: self.config,
            devices: self.devices,
            peer_factory: self.peer_factory,
            signals,
        };
        tokio::spawn(CallActor::new(parts, command_rx, state_tx).run());

        CallSession {
            self_id: self.self_id,
            command_tx,
            state_rx,
        }
    }
}

impl CallSession {
    pub fn builder(
        self_id: impl Into<ParticipantId>,
        transport: Arc<dyn SignalTransport>,
    ) -> CallSessionBuilder {
        CallSessionBuilder {
            self_id: self_id.into(),
            transport,
            config: SessionConfig::default(),
            devices: Arc::new(SampleDevices::new()),
            peer_factory: Arc::new(RtcPeerFactory::new()),
        }
    }

    pub fn self_id(&self) -> &ParticipantId {
        &self.self_id
    }

    /// Choose the counterpart, or clear it with `None`. Returns the active room.
    pub async fn select_peer(&self, peer: Option<ParticipantId>) -> Result<RoomId, CallError> {
        self.request(|reply| CallCommand::SelectPeer { peer, reply }).await
    }

    /// Call the selected counterpart.
    pub async fn start_call(&self) -> Result<(), CallError> {
        self.request(|reply| CallCommand::StartCall { reply }).await?
    }

    /// Hang up. Safe to call at any time; without a call it only resets state.
    pub async fn end_call(&self) -> Result<(), CallError> {
        self.request(|reply| CallCommand::EndCall { reply }).await
    }

    /// Flip the microphone. Returns the new flag, unchanged without local media.
    pub async fn toggle_audio(&self) -> Result<bool, CallError> {
        self.request(|reply| CallCommand::ToggleAudio { reply }).await
    }

    /// Flip the camera. Returns the new flag, unchanged without local media.
    pub async fn toggle_video(&self) -> Result<bool, CallError> {
        self.request(|reply| CallCommand::ToggleVideo { reply }).await
    }

    pub async fn start_screen_share(&self) -> Result<(), CallError> {
        self.request(|reply| CallCommand::StartScreenShare { reply }).await?
    }

    pub async fn stop_screen_share(&self) -> Result<(), CallError> {
        self.request(|reply| CallCommand::StopScreenShare { reply }).await
    }

    /// Send a chat line. Blank text, or no open channel, is a no-op.
    pub async fn send_message(&self, text: impl Into<String>) -> Result<(), CallError> {
        let text = text.into();
        self.request(|reply| CallCommand::SendMessage { text, reply }).await
    }

    /// Latest state snapshot.
    pub fn state(&self) -> CallState {
        self.state_rx.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn watch(&self) -> watch::Receiver<CallState> {
        self.state_rx.clone()
    }

    /// Tear the session down and stop the actor. Other clones get
    /// [`CallError::Closed`] from then on.
    pub async fn close(self) {
        let _ = self.request(|reply| CallCommand::Shutdown { reply }).await;
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> CallCommand,
    ) -> Result<T, CallError> {
        let (reply, response) = oneshot::channel();
        self.command_tx
            .send(command(reply))
            .await
            .map_err(|_| CallError::Closed)?;
        response.await.map_err(|_| CallError::Closed)
    }
}
