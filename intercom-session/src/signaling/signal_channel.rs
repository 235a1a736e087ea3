use intercom_core::SignalMessage;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::signaling::signal_transport::SignalTransport;

const INBOUND_CAPACITY: usize = 64;

/// Bidirectional signaling channel built on a one-way subscription plus a
/// fire-and-forget publish endpoint.
///
/// Outgoing messages go through a single publisher task, so they reach the
/// transport in the order they were sent. At most one subscription is live
/// at a time: [`SignalChannel::listen`] replaces the previous one.
pub struct SignalChannel {
    transport: Arc<dyn SignalTransport>,
    outbound: Option<mpsc::UnboundedSender<SignalMessage>>,
    subscription: Option<JoinHandle<()>>,
    resubscribe_delay: Duration,
}

impl SignalChannel {
    pub fn open(transport: Arc<dyn SignalTransport>, resubscribe_delay: Duration) -> Self {
        let (outbound, mut rx) = mpsc::unbounded_channel::<SignalMessage>();

        let publisher = transport.clone();
        tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                if let Err(e) = publisher.publish(&message).await {
                    debug!("Failed to publish {} signal: {}", message.kind(), e);
                }
            }
            trace!("Signal publisher finished");
        });

        Self {
            transport,
            outbound: Some(outbound),
            subscription: None,
            resubscribe_delay,
        }
    }

    /// Queue a message for publishing. Never blocks; delivery is best-effort.
    pub fn send(&self, message: SignalMessage) {
        let Some(outbound) = &self.outbound else {
            trace!("Signal channel closed, dropping {} signal", message.kind());
            return;
        };
        let _ = outbound.send(message);
    }

    /// Start a fresh subscription and return its receiver, tearing down any
    /// previous one so handlers never accumulate.
    pub fn listen(&mut self) -> mpsc::Receiver<SignalMessage> {
        self.stop_subscription();

        let (tx, rx) = mpsc::channel(INBOUND_CAPACITY);
        let transport = self.transport.clone();
        let delay = self.resubscribe_delay;

        self.subscription = Some(tokio::spawn(async move {
            loop {
                match transport.subscribe(tx.clone()).await {
                    Ok(()) => debug!("Signal stream ended"),
                    Err(e) => warn!("Signal subscription failed: {}", e),
                }
                if tx.is_closed() {
                    break;
                }
                tokio::time::sleep(delay).await;
            }
        }));

        rx
    }

    pub fn is_listening(&self) -> bool {
        self.subscription
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop the subscription and let the publisher drain what is queued. Idempotent.
    pub fn close(&mut self) {
        self.stop_subscription();
        self.outbound = None;
    }

    fn stop_subscription(&mut self) {
        if let Some(handle) = self.subscription.take() {
            handle.abort();
        }
    }
}

impl Drop for SignalChannel {
    fn drop(&mut self) {
        self.close();
    }
}
