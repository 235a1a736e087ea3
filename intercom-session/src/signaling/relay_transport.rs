use async_trait::async_trait;
use futures::StreamExt;
use intercom_core::SignalMessage;
use reqwest::header::ACCEPT;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tokio_util::io::StreamReader;
use tracing::{debug, trace};

use crate::error::TransportError;
use crate::signaling::signal_transport::SignalTransport;
use crate::signaling::sse::{SseDecoder, SseEvent};

/// Path of the relay's publish/subscribe endpoint.
pub const SIGNALING_PATH: &str = "/api/signaling";

/// HTTP client for the signaling relay: POST to publish, server-sent events to subscribe.
#[derive(Clone)]
pub struct RelayTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl RelayTransport {
    /// `base_url` is the relay origin, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), SIGNALING_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SignalTransport for RelayTransport {
    async fn publish(&self, message: &SignalMessage) -> Result<(), TransportError> {
        self.client
            .post(&self.endpoint)
            .json(message)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn subscribe(&self, sink: mpsc::Sender<SignalMessage>) -> Result<(), TransportError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?
            .error_for_status()?;
        debug!("Subscribed to signal stream at {}", self.endpoint);

        let byte_stream = response
            .bytes_stream()
            .map(|result| result.map_err(std::io::Error::other));
        let reader = tokio::io::BufReader::new(StreamReader::new(byte_stream));
        let mut lines = reader.lines();
        let mut decoder = SseDecoder::new();

        while let Some(line) = lines.next_line().await? {
            let Some(event) = decoder.push_line(&line) else {
                continue;
            };
            if !forward(event, &sink).await {
                return Ok(());
            }
        }

        if let Some(event) = decoder.finish() {
            forward(event, &sink).await;
        }
        Ok(())
    }
}

/// Returns `false` once the sink has gone away.
async fn forward(event: SseEvent, sink: &mpsc::Sender<SignalMessage>) -> bool {
    // Named events (open, ping) are relay housekeeping
    if event.event.is_some() {
        return !sink.is_closed();
    }

    match SignalMessage::from_json(&event.data) {
        Ok(message) => sink.send(message).await.is_ok(),
        Err(e) => {
            trace!("Dropping undecodable signal payload: {}", e);
            !sink.is_closed()
        }
    }
}
