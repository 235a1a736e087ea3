use anyhow::Result;
use async_trait::async_trait;
use intercom_core::{IceCandidate, IceServerConfig, SessionDescription};
use std::sync::Arc;

use crate::media::LocalTrack;
use crate::peer::chat_link::ChatLink;
use crate::peer::peer_event::PeerEventSink;

/// Builds one peer session per call.
#[async_trait]
pub trait PeerFactory: Send + Sync + 'static {
    async fn create(
        &self,
        ice_servers: &[IceServerConfig],
        events: PeerEventSink,
    ) -> Result<Arc<dyn PeerSession>>;
}

/// The transport-level half of a call: media senders, SDP and ICE.
#[async_trait]
pub trait PeerSession: Send + Sync + 'static {
    /// Attach a local track on its own sender.
    async fn add_local_track(&self, track: &LocalTrack) -> Result<()>;

    async fn create_chat_channel(&self, label: &str) -> Result<Arc<dyn ChatLink>>;

    async fn create_offer(&self) -> Result<SessionDescription>;

    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn set_local_description(&self, description: &SessionDescription) -> Result<()>;

    async fn set_remote_description(&self, description: &SessionDescription) -> Result<()>;

    async fn add_ice_candidate(&self, candidate: &IceCandidate) -> Result<()>;

    /// Swap the track on the outgoing video sender without renegotiating.
    /// Returns `false` when there is no video sender.
    async fn replace_video_track(&self, track: &LocalTrack) -> Result<bool>;

    /// Id of the track currently on the outgoing video sender.
    async fn outgoing_video_track_id(&self) -> Option<String>;

    async fn close(&self) -> Result<()>;
}
