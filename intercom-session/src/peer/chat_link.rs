use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::data_channel::data_channel_state::RTCDataChannelState;

use crate::peer::peer_event::{PeerEvent, PeerEventSink};

/// Ordered, reliable text channel to the counterpart.
#[async_trait]
pub trait ChatLink: Send + Sync + 'static {
    fn label(&self) -> String;

    fn is_open(&self) -> bool;

    async fn send_text(&self, text: &str) -> Result<()>;

    async fn close(&self) -> Result<()>;
}

pub struct RtcChatLink {
    channel: Arc<RTCDataChannel>,
}

impl RtcChatLink {
    /// Wrap a data channel and route its open and message events into `events`.
    pub fn attach(channel: Arc<RTCDataChannel>, events: PeerEventSink) -> Arc<Self> {
        let label = channel.label().to_owned();

        let open_events = events.clone();
        let open_label = label.clone();
        channel.on_open(Box::new(move || {
            let events = open_events.clone();
            let label = open_label.clone();
            Box::pin(async move {
                debug!("Data channel '{}' open", label);
                events.emit(PeerEvent::ChatOpen);
            })
        }));

        channel.on_message(Box::new(move |msg: DataChannelMessage| {
            let events = events.clone();
            Box::pin(async move {
                let text = String::from_utf8_lossy(&msg.data).into_owned();
                events.emit(PeerEvent::ChatMessage(text));
            })
        }));

        Arc::new(Self { channel })
    }
}

#[async_trait]
impl ChatLink for RtcChatLink {
    fn label(&self) -> String {
        self.channel.label().to_owned()
    }

    fn is_open(&self) -> bool {
        self.channel.ready_state() == RTCDataChannelState::Open
    }

    async fn send_text(&self, text: &str) -> Result<()> {
        self.channel.send_text(text.to_owned()).await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.channel.close().await?;
        Ok(())
    }
}
