use async_trait::async_trait;
use dashmap::DashMap;
use intercom_core::SignalMessage;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::error::TransportError;
use crate::signaling::signal_transport::SignalTransport;

/// In-process signaling bus with the same fan-out semantics as the relay.
///
/// Useful when both call endpoints live in one process, and in tests.
#[derive(Clone, Default)]
pub struct LocalBus {
    subscribers: Arc<DashMap<Uuid, mpsc::Sender<SignalMessage>>>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Removes the subscriber when the subscription future is dropped or aborted.
struct Registration {
    subscribers: Arc<DashMap<Uuid, mpsc::Sender<SignalMessage>>>,
    id: Uuid,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.subscribers.remove(&self.id);
    }
}

#[async_trait]
impl SignalTransport for LocalBus {
    async fn publish(&self, message: &SignalMessage) -> Result<(), TransportError> {
        // Collect first so no map guard is held across an await
        let targets: Vec<_> = self
            .subscribers
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        for (id, sink) in targets {
            if sink.send(message.clone()).await.is_err() {
                debug!("Dropping closed local subscriber {}", id);
                self.subscribers.remove(&id);
            }
        }
        Ok(())
    }

    async fn subscribe(&self, sink: mpsc::Sender<SignalMessage>) -> Result<(), TransportError> {
        let registration = Registration {
            subscribers: self.subscribers.clone(),
            id: Uuid::new_v4(),
        };
        self.subscribers.insert(registration.id, sink.clone());

        sink.closed().await;
        drop(registration);
        Ok(())
    }
}
