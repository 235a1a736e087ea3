use anyhow::Result;
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use webrtc::media::Sample;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Audio,
    Video,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKind::Audio => f.write_str("audio"),
            TrackKind::Video => f.write_str("video"),
        }
    }
}

struct TrackInner {
    id: String,
    kind: TrackKind,
    enabled: AtomicBool,
    ended: watch::Sender<bool>,
    rtp: Arc<TrackLocalStaticSample>,
}

/// A captured local track.
///
/// The host feeds encoded media through [`LocalTrack::write_sample`]. While the
/// track is disabled (muted, camera off) or stopped, samples are discarded but
/// the track stays attached to its sender. Clones share state.
#[derive(Clone)]
pub struct LocalTrack {
    inner: Arc<TrackInner>,
}

impl LocalTrack {
    pub fn new(kind: TrackKind, codec: RTCRtpCodecCapability, id: &str, stream_id: &str) -> Self {
        let rtp = Arc::new(TrackLocalStaticSample::new(
            codec,
            id.to_owned(),
            stream_id.to_owned(),
        ));
        let (ended, _) = watch::channel(false);

        Self {
            inner: Arc::new(TrackInner {
                id: id.to_owned(),
                kind,
                enabled: AtomicBool::new(true),
                ended,
                rtp,
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn kind(&self) -> TrackKind {
        self.inner.kind
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::Acquire)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.inner.enabled.store(enabled, Ordering::Release);
    }

    /// Release the capture. Idempotent; wakes every [`LocalTrack::ended`] waiter.
    pub fn stop(&self) {
        self.inner.ended.send_replace(true);
    }

    pub fn is_live(&self) -> bool {
        !*self.inner.ended.borrow()
    }

    /// Resolves once the track has been stopped, by us or by the capture source.
    pub async fn ended(&self) {
        let mut rx = self.inner.ended.subscribe();
        let _ = rx.wait_for(|ended| *ended).await;
    }

    /// The RTP-facing half handed to the peer connection.
    pub fn rtp(&self) -> Arc<TrackLocalStaticSample> {
        self.inner.rtp.clone()
    }

    pub async fn write_sample(&self, sample: &Sample) -> Result<()> {
        if !self.is_live() || !self.is_enabled() {
            return Ok(());
        }
        self.inner.rtp.write_sample(sample).await?;
        Ok(())
    }

    /// Write one encoded frame lasting `duration`.
    pub async fn write_frame(&self, data: Bytes, duration: Duration) -> Result<()> {
        let sample = Sample {
            data,
            duration,
            ..Default::default()
        };
        self.write_sample(&sample).await
    }
}

impl fmt::Debug for LocalTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalTrack")
            .field("id", &self.inner.id)
            .field("kind", &self.inner.kind)
            .field("enabled", &self.is_enabled())
            .field("live", &self.is_live())
            .finish()
    }
}

impl PartialEq for LocalTrack {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Tracks captured together by one device request.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalStream {
    pub id: String,
    pub tracks: Vec<LocalTrack>,
}

impl LocalStream {
    pub fn new(id: impl Into<String>, tracks: Vec<LocalTrack>) -> Self {
        Self {
            id: id.into(),
            tracks,
        }
    }

    pub fn audio_tracks(&self) -> impl Iterator<Item = &LocalTrack> {
        self.tracks.iter().filter(|t| t.kind() == TrackKind::Audio)
    }

    pub fn video_tracks(&self) -> impl Iterator<Item = &LocalTrack> {
        self.tracks.iter().filter(|t| t.kind() == TrackKind::Video)
    }

    pub fn first_video_track(&self) -> Option<&LocalTrack> {
        self.video_tracks().next()
    }

    pub fn stop(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }
}
