use async_trait::async_trait;
use intercom_core::SignalMessage;
use tokio::sync::mpsc;

use crate::error::TransportError;

/// A process-wide publish/subscribe bus for signaling messages.
///
/// The bus has a single topic: every subscriber sees every publish, including
/// its own. Partitioning into calls happens on the receiving side by room id.
#[async_trait]
pub trait SignalTransport: Send + Sync + 'static {
    /// Fire-and-forget delivery to all current subscribers.
    async fn publish(&self, message: &SignalMessage) -> Result<(), TransportError>;

    /// Forward incoming messages into `sink` until the underlying stream ends
    /// or the sink is closed.
    async fn subscribe(&self, sink: mpsc::Sender<SignalMessage>) -> Result<(), TransportError>;
}
