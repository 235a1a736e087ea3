use tracing::{debug, info, warn};

use crate::call::actor::CallActor;
use crate::error::{CallError, CallFailure, MediaError};
use crate::media::LocalTrack;
use crate::peer::{PeerEvent, PeerEventSink};

impl CallActor {
    pub(super) fn toggle_audio(&mut self) -> bool {
        let Some(stream) = &self.state.local_stream else {
            return self.state.audio_on;
        };

        let next = !self.state.audio_on;
        for track in stream.audio_tracks() {
            track.set_enabled(next);
        }
        self.state.audio_on = next;
        self.publish_state();
        next
    }

    pub(super) fn toggle_video(&mut self) -> bool {
        let Some(stream) = &self.state.local_stream else {
            return self.state.video_on;
        };

        let next = !self.state.video_on;
        for track in stream.video_tracks() {
            track.set_enabled(next);
        }
        self.state.video_on = next;
        self.publish_state();
        next
    }

    /// Put a display capture on the outgoing video sender in place of the camera.
    pub(super) async fn start_screen_share(&mut self) -> Result<(), CallError> {
        let Some(session) = &self.session else {
            debug!("Screen share requested without a call");
            return Ok(());
        };
        let peer = session.peer.clone();
        let events = session.events.clone();

        let display = self
            .devices
            .get_display_media()
            .await
            .map_err(|e| CallError::ScreenShare(e.into()))?;
        let Some(screen) = display.first_video_track().cloned() else {
            display.stop();
            return Err(CallError::ScreenShare(MediaError::NoVideoTrack.into()));
        };

        match peer.replace_video_track(&screen).await {
            Ok(true) => {}
            Ok(false) => {
                display.stop();
                return Err(CallError::ScreenShare(CallFailure::NoVideoSender));
            }
            Err(e) => {
                display.stop();
                warn!("Failed to switch outgoing video to screen: {:?}", e);
                return Err(CallError::ScreenShare(CallFailure::Negotiation(e)));
            }
        }

        let previous = self
            .session
            .as_mut()
            .and_then(|session| session.screen_track.replace(screen.clone()));
        if let Some(previous) = previous {
            previous.stop();
        }

        watch_share_end(screen, events);

        info!("Screen sharing started");
        self.state.screen_sharing = true;
        self.publish_state();
        Ok(())
    }

    /// Restore the camera on the outgoing video sender.
    pub(super) async fn stop_screen_share(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(stream) = &self.state.local_stream else {
            return;
        };

        if let Some(camera) = stream.first_video_track() {
            match session.peer.replace_video_track(camera).await {
                Ok(true) => {}
                Ok(false) => debug!("No outgoing video sender to restore the camera on"),
                Err(e) => debug!("Failed to restore camera track: {:?}", e),
            }
        }

        if let Some(screen) = session.screen_track.take() {
            screen.stop();
            info!("Screen sharing stopped");
        }
        self.state.screen_sharing = false;
        self.publish_state();
    }

    /// The screen track ended; run the stop path if it is still the one on air.
    pub(super) async fn on_share_ended(&mut self, track: LocalTrack) {
        let current = self
            .session
            .as_ref()
            .and_then(|session| session.screen_track.as_ref());
        if current != Some(&track) {
            return;
        }
        debug!("Screen track {} ended externally", track.id());
        self.stop_screen_share().await;
    }
}

fn watch_share_end(screen: LocalTrack, events: PeerEventSink) {
    tokio::spawn(async move {
        screen.ended().await;
        events.emit(PeerEvent::ShareEnded(screen));
    });
}
