use async_trait::async_trait;
use uuid::Uuid;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;

use crate::error::MediaError;
use crate::media::track::{LocalStream, LocalTrack, TrackKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    pub audio: bool,
    pub video: bool,
}

impl MediaConstraints {
    pub fn audio_video() -> Self {
        Self {
            audio: true,
            video: true,
        }
    }
}

/// Source of local capture streams.
#[async_trait]
pub trait MediaDevices: Send + Sync + 'static {
    /// Camera and/or microphone capture.
    async fn get_user_media(&self, constraints: MediaConstraints)
    -> Result<LocalStream, MediaError>;

    /// Screen capture. The returned stream carries at least one video track.
    async fn get_display_media(&self) -> Result<LocalStream, MediaError>;
}

/// Devices backed by sample-fed tracks: Opus for audio, VP8 for video.
///
/// Nothing is captured on its own; the host writes encoded frames into the
/// returned tracks.
#[derive(Debug, Clone, Default)]
pub struct SampleDevices;

impl SampleDevices {
    pub fn new() -> Self {
        Self
    }

    fn opus() -> RTCRtpCodecCapability {
        RTCRtpCodecCapability {
            mime_type: MIME_TYPE_OPUS.to_owned(),
            clock_rate: 48_000,
            channels: 2,
            ..Default::default()
        }
    }

    fn vp8() -> RTCRtpCodecCapability {
        RTCRtpCodecCapability {
            mime_type: MIME_TYPE_VP8.to_owned(),
            clock_rate: 90_000,
            ..Default::default()
        }
    }
}

#[async_trait]
impl MediaDevices for SampleDevices {
    async fn get_user_media(
        &self,
        constraints: MediaConstraints,
    ) -> Result<LocalStream, MediaError> {
        if !constraints.audio && !constraints.video {
            return Err(MediaError::DeviceUnavailable(
                "no capture kind requested".to_owned(),
            ));
        }

        let stream_id = Uuid::new_v4().to_string();
        let mut tracks = Vec::new();
        if constraints.audio {
            tracks.push(LocalTrack::new(
                TrackKind::Audio,
                Self::opus(),
                "microphone",
                &stream_id,
            ));
        }
        if constraints.video {
            tracks.push(LocalTrack::new(
                TrackKind::Video,
                Self::vp8(),
                "camera",
                &stream_id,
            ));
        }

        Ok(LocalStream::new(stream_id, tracks))
    }

    async fn get_display_media(&self) -> Result<LocalStream, MediaError> {
        let stream_id = Uuid::new_v4().to_string();
        let screen = LocalTrack::new(TrackKind::Video, Self::vp8(), "screen", &stream_id);
        Ok(LocalStream::new(stream_id, vec![screen]))
    }
}
