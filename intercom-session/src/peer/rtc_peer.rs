use anyhow::{Context, Result};
use async_trait::async_trait;
use intercom_core::{IceCandidate, IceServerConfig, SdpKind, SessionDescription};
use std::sync::Arc;
use tracing::{debug, info, trace};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_init::RTCDataChannelInit;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_sender::RTCRtpSender;
use webrtc::track::track_local::TrackLocal;

use crate::media::{LocalTrack, RemoteTrack, TrackKind};
use crate::peer::chat_link::{ChatLink, RtcChatLink};
use crate::peer::peer_event::{LinkState, PeerEvent, PeerEventSink};
use crate::peer::peer_session::{PeerFactory, PeerSession};

/// Creates webrtc-rs peer connections with the default codecs and interceptors.
#[derive(Debug, Clone, Default)]
pub struct RtcPeerFactory;

impl RtcPeerFactory {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PeerFactory for RtcPeerFactory {
    async fn create(
        &self,
        ice_servers: &[IceServerConfig],
        events: PeerEventSink,
    ) -> Result<Arc<dyn PeerSession>> {
        let session: Arc<dyn PeerSession> = Arc::new(RtcPeerSession::new(ice_servers, events).await?);
        Ok(session)
    }
}

pub struct RtcPeerSession {
    pc: Arc<RTCPeerConnection>,
    events: PeerEventSink,
}

impl RtcPeerSession {
    pub async fn new(ice_servers: &[IceServerConfig], events: PeerEventSink) -> Result<Self> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                })
                .collect(),
            ..Default::default()
        };

        let pc = Arc::new(api.new_peer_connection(rtc_config).await?);

        // Connection state
        let state_events = events.clone();
        let generation = events.generation();
        pc.on_peer_connection_state_change(Box::new(move |s: RTCPeerConnectionState| {
            let events = state_events.clone();
            Box::pin(async move {
                info!("Peer connection state changed (session {}): {}", generation, s);
                events.emit(PeerEvent::LinkState(link_state(s)));
            })
        }));

        // Trickle ICE
        let ice_events = events.clone();
        pc.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let events = ice_events.clone();
            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                events.emit(PeerEvent::LocalCandidate(IceCandidate {
                    candidate: init.candidate,
                    sdp_mid: init.sdp_mid,
                    sdp_m_line_index: init.sdp_mline_index,
                    username_fragment: init.username_fragment,
                }));
            })
        }));

        // Channel opened by the counterpart
        let dc_events = events.clone();
        pc.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
            let events = dc_events.clone();
            Box::pin(async move {
                debug!("Remote data channel '{}' announced", dc.label());
                let link: Arc<dyn ChatLink> = RtcChatLink::attach(dc, events.clone());
                events.emit(PeerEvent::DataChannel(link));
            })
        }));

        let track_events = events.clone();
        pc.on_track(Box::new(move |track, _receiver, _transceiver| {
            let events = track_events.clone();
            Box::pin(async move {
                let kind = match track.kind() {
                    RTPCodecType::Audio => TrackKind::Audio,
                    RTPCodecType::Video => TrackKind::Video,
                    _ => return,
                };
                let mut remote =
                    RemoteTrack::new(track.id().to_string(), track.stream_id().to_string(), kind);
                remote.source = Some(track);
                events.emit(PeerEvent::RemoteTrack(remote));
            })
        }));

        Ok(Self { pc, events })
    }

    async fn video_sender(&self) -> Option<Arc<RTCRtpSender>> {
        for sender in self.pc.get_senders().await {
            let Some(track) = sender.track().await else {
                continue;
            };
            if track.kind() == RTPCodecType::Video {
                return Some(sender);
            }
        }
        None
    }
}

#[async_trait]
impl PeerSession for RtcPeerSession {
    async fn add_local_track(&self, track: &LocalTrack) -> Result<()> {
        let rtp: Arc<dyn TrackLocal + Send + Sync> = track.rtp();
        let sender = self
            .pc
            .add_track(rtp)
            .await
            .with_context(|| format!("failed to add {} track", track.kind()))?;

        // RTCP has to be drained for interceptors to work
        tokio::spawn(async move {
            let mut rtcp_buf = vec![0u8; 1500];
            while sender.read(&mut rtcp_buf).await.is_ok() {}
        });
        Ok(())
    }

    async fn create_chat_channel(&self, label: &str) -> Result<Arc<dyn ChatLink>> {
        let init = RTCDataChannelInit {
            ordered: Some(true),
            ..Default::default()
        };
        let channel = self.pc.create_data_channel(label, Some(init)).await?;
        let link: Arc<dyn ChatLink> = RtcChatLink::attach(channel, self.events.clone());
        Ok(link)
    }

    async fn create_offer(&self) -> Result<SessionDescription> {
        let offer = self.pc.create_offer(None).await?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        let answer = self.pc.create_answer(None).await?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn set_local_description(&self, description: &SessionDescription) -> Result<()> {
        self.pc.set_local_description(to_rtc(description)?).await?;
        Ok(())
    }

    async fn set_remote_description(&self, description: &SessionDescription) -> Result<()> {
        self.pc.set_remote_description(to_rtc(description)?).await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: &IceCandidate) -> Result<()> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate.clone(),
            sdp_mid: candidate.sdp_mid.clone(),
            sdp_mline_index: candidate.sdp_m_line_index,
            username_fragment: candidate.username_fragment.clone(),
        };
        self.pc.add_ice_candidate(init).await?;
        Ok(())
    }

    async fn replace_video_track(&self, track: &LocalTrack) -> Result<bool> {
        let Some(sender) = self.video_sender().await else {
            return Ok(false);
        };
        let rtp: Arc<dyn TrackLocal + Send + Sync> = track.rtp();
        sender.replace_track(Some(rtp)).await?;
        trace!("Outgoing video now carries track {}", track.id());
        Ok(true)
    }

    async fn outgoing_video_track_id(&self) -> Option<String> {
        let sender = self.video_sender().await?;
        let track = sender.track().await?;
        Some(track.id().to_owned())
    }

    async fn close(&self) -> Result<()> {
        self.pc.close().await?;
        Ok(())
    }
}

fn to_rtc(description: &SessionDescription) -> Result<RTCSessionDescription> {
    let sdp = description.sdp.clone();
    let rtc = match description.kind {
        SdpKind::Offer => RTCSessionDescription::offer(sdp)?,
        SdpKind::Answer => RTCSessionDescription::answer(sdp)?,
        SdpKind::Pranswer => RTCSessionDescription::pranswer(sdp)?,
        SdpKind::Rollback => anyhow::bail!("rollback descriptions are not supported"),
    };
    Ok(rtc)
}

fn link_state(state: RTCPeerConnectionState) -> LinkState {
    match state {
        RTCPeerConnectionState::Connected => LinkState::Connected,
        RTCPeerConnectionState::Disconnected => LinkState::Disconnected,
        RTCPeerConnectionState::Failed => LinkState::Failed,
        RTCPeerConnectionState::Closed => LinkState::Closed,
        _ => LinkState::Other,
    }
}
