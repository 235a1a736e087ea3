use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, trace};
use uuid::Uuid;

type Subscribers = DashMap<Uuid, mpsc::UnboundedSender<String>>;

/// Process-wide fan-out of signal payloads to every open subscription.
///
/// Payloads are opaque JSON text; the hub never looks inside them.
#[derive(Clone, Default)]
pub struct SignalHub {
    subscribers: Arc<Subscribers>,
}

impl SignalHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.insert(id, tx);
        debug!(
            "Subscriber {} connected ({} total)",
            id,
            self.subscribers.len()
        );

        Subscription {
            id,
            rx,
            subscribers: self.subscribers.clone(),
        }
    }

    /// Deliver `payload` to every subscriber. Returns how many received it.
    pub fn publish(&self, payload: &str) -> usize {
        let mut delivered = 0;
        let mut gone = Vec::new();

        for entry in self.subscribers.iter() {
            if entry.value().send(payload.to_owned()).is_ok() {
                delivered += 1;
            } else {
                gone.push(*entry.key());
            }
        }

        // Removal happens outside the iteration, which holds shard locks
        for id in gone {
            trace!("Pruning closed subscriber {}", id);
            self.subscribers.remove(&id);
        }
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// One subscriber's queue. Unregisters itself on drop.
pub struct Subscription {
    id: Uuid,
    rx: mpsc::UnboundedReceiver<String>,
    subscribers: Arc<Subscribers>,
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.subscribers.remove(&self.id);
        debug!("Subscriber {} disconnected", self.id);
    }
}
