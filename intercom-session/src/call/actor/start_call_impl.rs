use anyhow::Context;
use intercom_core::{SessionDescription, SignalMessage};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::call::actor::{ActiveSession, CallActor, Teardown};
use crate::call::call_state::SessionPhase;
use crate::error::{CallError, CallFailure};
use crate::media::{LocalStream, MediaConstraints};
use crate::peer::{PeerEventSink, PeerSession};

impl CallActor {
    /// Initiator path: Idle -> Offering.
    pub(super) async fn start_call(&mut self) -> Result<(), CallError> {
        if self.state.phase != SessionPhase::Idle || self.session.is_some() {
            return Err(CallError::CallInProgress);
        }
        if self.state.room.is_idle() {
            return Err(CallError::NoCounterpart);
        }

        info!("Starting call in room {}", self.state.room);
        let (audio_on, video_on) = (self.state.audio_on, self.state.video_on);
        let last_error = self.state.last_error.take();
        self.pending.clear();
        // Dialling claims the room
        self.room_adopted = false;

        let timeout = self.config.negotiation_timeout();
        let result = match tokio::time::timeout(timeout, self.initiate()).await {
            Ok(result) => result,
            Err(_) => Err(CallFailure::Negotiation(anyhow::anyhow!(
                "offer not produced within {:?}",
                timeout
            ))),
        };

        match result {
            Ok(()) => {
                self.state.in_call = true;
                self.set_phase(SessionPhase::Offering);
                self.publish_state();
                Ok(())
            }
            Err(failure) => {
                warn!("Failed to start call in room {}: {}", self.state.room, failure);
                self.teardown(Teardown::Abort).await;
                self.state.audio_on = audio_on;
                self.state.video_on = video_on;
                self.state.last_error = last_error;
                self.publish_state();
                Err(CallError::Start(failure))
            }
        }
    }

    async fn initiate(&mut self) -> Result<(), CallFailure> {
        let stream = self.acquire_media().await?;
        let peer = self.construct_peer().await?;

        let chat = peer
            .create_chat_channel(&self.config.chat_label)
            .await
            .context("failed to create chat channel")?;
        if let Some(session) = self.session.as_mut() {
            session.chat = Some(chat);
        }

        attach_tracks(peer.as_ref(), &stream).await?;

        let offer = peer.create_offer().await.context("failed to create offer")?;
        peer.set_local_description(&offer)
            .await
            .context("failed to apply local offer")?;

        self.send_signal(|room_id, sender_id| SignalMessage::Offer {
            sdp: offer,
            room_id,
            sender_id,
        });
        Ok(())
    }

    /// Responder path: Idle -> Answering -> Active.
    pub(super) async fn accept_offer(&mut self, offer: SessionDescription) {
        info!("Answering call in room {}", self.state.room);
        self.state.last_error = None;
        self.set_phase(SessionPhase::Answering);
        self.publish_state();

        let timeout = self.config.negotiation_timeout();
        let result = match tokio::time::timeout(timeout, self.answer(offer)).await {
            Ok(result) => result,
            Err(_) => Err(CallFailure::Negotiation(anyhow::anyhow!(
                "answer not produced within {:?}",
                timeout
            ))),
        };

        match result {
            Ok(()) => {
                self.state.in_call = true;
                self.set_phase(SessionPhase::Active);
                self.publish_state();
                info!("Call in room {} is active", self.state.room);
            }
            Err(failure) => {
                warn!("Failed to answer call in room {}: {}", self.state.room, failure);
                self.teardown(Teardown::Failed).await;
                self.state.last_error = Some(CallError::Start(failure).to_string());
                self.publish_state();
            }
        }
    }

    async fn answer(&mut self, offer: SessionDescription) -> Result<(), CallFailure> {
        let stream = self.acquire_media().await?;
        let peer = self.construct_peer().await?;
        attach_tracks(peer.as_ref(), &stream).await?;

        self.apply_remote_description(&offer).await?;

        let answer = peer.create_answer().await.context("failed to create answer")?;
        peer.set_local_description(&answer)
            .await
            .context("failed to apply local answer")?;

        self.send_signal(|room_id, sender_id| SignalMessage::Answer {
            sdp: answer,
            room_id,
            sender_id,
        });
        Ok(())
    }

    /// Offering -> Connecting -> Active.
    pub(super) async fn accept_answer(&mut self, answer: SessionDescription) {
        self.set_phase(SessionPhase::Connecting);
        self.publish_state();

        match self.apply_remote_description(&answer).await {
            Ok(()) => {
                self.set_phase(SessionPhase::Active);
                self.publish_state();
                info!("Call in room {} is active", self.state.room);
            }
            Err(failure) => {
                warn!("Failed to apply answer in room {}: {}", self.state.room, failure);
                self.teardown(Teardown::Failed).await;
                self.state.last_error = Some(CallError::Start(failure).to_string());
                self.publish_state();
            }
        }
    }

    /// Set the remote description, then drain buffered candidates in order.
    async fn apply_remote_description(
        &mut self,
        description: &SessionDescription,
    ) -> Result<(), CallFailure> {
        let Some(session) = self.session.as_mut() else {
            return Err(CallFailure::Negotiation(anyhow::anyhow!(
                "no peer session for remote description"
            )));
        };

        session
            .peer
            .set_remote_description(description)
            .await
            .context("failed to apply remote description")?;
        session.remote_applied = true;

        let peer = session.peer.clone();
        let buffered = self.pending.drain();
        if !buffered.is_empty() {
            debug!("Applying {} buffered candidates", buffered.len());
        }
        for candidate in buffered {
            if let Err(e) = peer.add_ice_candidate(&candidate).await {
                debug!("Failed to apply buffered candidate: {:?}", e);
            }
        }
        Ok(())
    }

    /// Capture camera and microphone, publishing the stream into state.
    async fn acquire_media(&mut self) -> Result<LocalStream, CallFailure> {
        let stream = self
            .devices
            .get_user_media(MediaConstraints::audio_video())
            .await?;

        self.state.local_stream = Some(stream.clone());
        self.state.audio_on = true;
        self.state.video_on = true;
        self.publish_state();
        Ok(stream)
    }

    /// Build a fresh peer session and make it the active one.
    async fn construct_peer(&mut self) -> Result<Arc<dyn PeerSession>, CallFailure> {
        self.generation += 1;
        let events = PeerEventSink::new(self.generation, self.peer_tx.clone());

        let peer = self
            .peer_factory
            .create(&self.config.ice_servers(), events.clone())
            .await
            .context("failed to create peer connection")?;

        self.session = Some(ActiveSession {
            peer: peer.clone(),
            events,
            remote_applied: false,
            chat: None,
            screen_track: None,
        });
        Ok(peer)
    }
}

async fn attach_tracks(peer: &dyn PeerSession, stream: &LocalStream) -> Result<(), CallFailure> {
    for track in &stream.tracks {
        peer.add_local_track(track).await?;
    }
    Ok(())
}
