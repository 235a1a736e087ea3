use intercom_core::{ParticipantId, RoomId, SignalMessage};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::call::call_command::CallCommand;
use crate::call::call_state::{CallState, SessionPhase};
use crate::call::pending::PendingCandidates;
use crate::config::SessionConfig;
use crate::media::{LocalTrack, MediaDevices};
use crate::peer::{ChatLink, PeerEnvelope, PeerEventSink, PeerFactory, PeerSession};
use crate::signaling::SignalChannel;

mod chat_impl;
mod handle_signal_impl;
mod media_impl;
mod peer_event_impl;
mod select_peer_impl;
mod start_call_impl;
mod teardown_impl;

use teardown_impl::Teardown;

/// The live peer session of the current call.
struct ActiveSession {
    peer: Arc<dyn PeerSession>,
    /// Sink stamped with this session's generation.
    events: PeerEventSink,
    remote_applied: bool,
    chat: Option<Arc<dyn ChatLink>>,
    screen_track: Option<LocalTrack>,
}

/// Collaborators the actor is built from.
pub(crate) struct ActorParts {
    pub self_id: ParticipantId,
    pub config: SessionConfig,
    pub devices: Arc<dyn MediaDevices>,
    pub peer_factory: Arc<dyn PeerFactory>,
    pub signals: SignalChannel,
}

/// Single owner of a call session.
///
/// Commands, inbound signals, peer events and the negotiation deadline are
/// all handled on this one task, one at a time, so nothing else touches the
/// session or the candidate buffer.
pub(crate) struct CallActor {
    self_id: ParticipantId,
    config: SessionConfig,
    devices: Arc<dyn MediaDevices>,
    peer_factory: Arc<dyn PeerFactory>,

    signals: SignalChannel,
    inbound: mpsc::Receiver<SignalMessage>,

    command_rx: mpsc::Receiver<CallCommand>,

    peer_tx: mpsc::UnboundedSender<PeerEnvelope>,
    peer_rx: mpsc::UnboundedReceiver<PeerEnvelope>,

    /// Bumped for every peer session; events from older ones are stale.
    generation: u64,
    session: Option<ActiveSession>,
    pending: PendingCandidates,
    /// Remote candidates belong to an offer this side turned down in a collision.
    discard_remote_candidates: bool,
    deadline: Option<Instant>,

    /// The active room came from an inbound signal, not from `select_peer`.
    room_adopted: bool,

    state: CallState,
    state_tx: watch::Sender<CallState>,
}

impl CallActor {
    pub fn new(
        parts: ActorParts,
        command_rx: mpsc::Receiver<CallCommand>,
        state_tx: watch::Sender<CallState>,
    ) -> Self {
        let ActorParts {
            self_id,
            config,
            devices,
            peer_factory,
            mut signals,
        } = parts;

        let inbound = signals.listen();
        let (peer_tx, peer_rx) = mpsc::unbounded_channel();

        Self {
            self_id,
            config,
            devices,
            peer_factory,
            signals,
            inbound,
            command_rx,
            peer_tx,
            peer_rx,
            generation: 0,
            session: None,
            pending: PendingCandidates::new(),
            discard_remote_candidates: false,
            deadline: None,
            room_adopted: false,
            state: CallState::default(),
            state_tx,
        }
    }

    /// Main loop. Runs until the facade shuts it down or goes away.
    pub async fn run(mut self) {
        info!("Call session for {} started", self.self_id);

        loop {
            let deadline = self.deadline.unwrap_or_else(Instant::now);

            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(c) => {
                            if !self.handle_command(c).await {
                                break;
                            }
                        }
                        None => {
                            info!("Command channel closed. Shutting down call session.");
                            self.shutdown().await;
                            break;
                        }
                    }
                }

                msg = self.inbound.recv() => {
                    match msg {
                        Some(m) => self.handle_signal(m).await,
                        None => {
                            // Subscription task was replaced or died; start a fresh one
                            debug!("Inbound signal stream closed, resubscribing");
                            self.inbound = self.signals.listen();
                        }
                    }
                }

                Some(envelope) = self.peer_rx.recv() => {
                    self.handle_peer_event(envelope).await;
                }

                _ = tokio::time::sleep_until(deadline), if self.deadline.is_some() => {
                    self.handle_negotiation_timeout().await;
                }
            }
        }

        info!("Call session for {} finished", self.self_id);
    }

    /// Returns `false` once the actor should stop.
    async fn handle_command(&mut self, cmd: CallCommand) -> bool {
        match cmd {
            CallCommand::SelectPeer { peer, reply } => {
                let room = self.select_peer(peer).await;
                let _ = reply.send(room);
            }
            CallCommand::StartCall { reply } => {
                let result = self.start_call().await;
                let _ = reply.send(result);
            }
            CallCommand::EndCall { reply } => {
                self.teardown(Teardown::Local).await;
                let _ = reply.send(());
            }
            CallCommand::ToggleAudio { reply } => {
                let _ = reply.send(self.toggle_audio());
            }
            CallCommand::ToggleVideo { reply } => {
                let _ = reply.send(self.toggle_video());
            }
            CallCommand::StartScreenShare { reply } => {
                let result = self.start_screen_share().await;
                let _ = reply.send(result);
            }
            CallCommand::StopScreenShare { reply } => {
                self.stop_screen_share().await;
                let _ = reply.send(());
            }
            CallCommand::SendMessage { text, reply } => {
                self.send_message(text).await;
                let _ = reply.send(());
            }
            CallCommand::Shutdown { reply } => {
                self.shutdown().await;
                let _ = reply.send(());
                return false;
            }
        }
        true
    }

    async fn shutdown(&mut self) {
        self.teardown(Teardown::Shutdown).await;
        self.signals.close();
    }

    fn set_phase(&mut self, phase: SessionPhase) {
        if self.state.phase != phase {
            debug!("Call phase {} -> {}", self.state.phase, phase);
            self.state.phase = phase;
        }
        match phase {
            SessionPhase::Offering | SessionPhase::Answering => {
                self.deadline = Some(Instant::now() + self.config.negotiation_timeout());
            }
            SessionPhase::Idle | SessionPhase::Active => self.deadline = None,
            SessionPhase::Connecting => {}
        }
    }

    /// Push the current snapshot to every watcher.
    fn publish_state(&self) {
        self.state_tx.send_replace(self.state.clone());
    }

    /// Queue a signal addressed to the active room.
    fn send_signal(&self, build: impl FnOnce(RoomId, ParticipantId) -> SignalMessage) {
        let message = build(self.state.room.clone(), self.self_id.clone());
        debug!("Publishing {} to room {}", message.kind(), self.state.room);
        self.signals.send(message);
    }
}
