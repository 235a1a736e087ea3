use futures::StreamExt;
use futures::stream::BoxStream;
use intercom_relay::{RelayConfig, RelayServer, SIGNALING_ROUTE, SignalHub};
use intercom_session::{SseDecoder, SseEvent};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::oneshot;

const WAIT: Duration = Duration::from_secs(5);

/// Relay bound to an ephemeral local port, stopped on drop.
pub struct TestRelay {
    pub addr: SocketAddr,
    pub hub: SignalHub,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestRelay {
    pub async fn start() -> Self {
        Self::start_with_keep_alive(Duration::from_secs(25)).await
    }

    pub async fn start_with_keep_alive(keep_alive: Duration) -> Self {
        let config = RelayConfig {
            bind: SocketAddr::from(([127, 0, 0, 1], 0)),
            keep_alive,
        };
        let server = RelayServer::bind(config).await.expect("failed to bind relay");
        let addr = server.local_addr().unwrap();
        let hub = server.hub();

        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(server.run_until(async move {
            let _ = rx.await;
        }));

        Self {
            addr,
            hub,
            shutdown: Some(tx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url(), SIGNALING_ROUTE)
    }

    /// Open a raw event stream and wait until the relay has registered it.
    pub async fn open_stream(&self) -> EventStream {
        let before = self.hub.subscriber_count();
        let response = reqwest::Client::new()
            .get(self.endpoint())
            .header("accept", "text/event-stream")
            .send()
            .await
            .expect("subscribe request failed");
        assert!(response.status().is_success());
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        assert!(content_type.starts_with("text/event-stream"));

        self.wait_for_subscribers(before + 1).await;
        EventStream {
            body: response
                .bytes_stream()
                .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
                .boxed(),
            buffer: String::new(),
            decoder: SseDecoder::new(),
        }
    }

    pub async fn post(&self, body: &str) -> reqwest::Response {
        reqwest::Client::new()
            .post(self.endpoint())
            .header("content-type", "application/json")
            .body(body.to_owned())
            .send()
            .await
            .expect("publish request failed")
    }

    pub async fn wait_for_subscribers(&self, count: usize) {
        let start = tokio::time::Instant::now();
        while self.hub.subscriber_count() != count {
            assert!(
                start.elapsed() < WAIT,
                "relay never reached {} subscribers (has {})",
                count,
                self.hub.subscriber_count()
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl Drop for TestRelay {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Client side of one SSE subscription, decoded event by event.
pub struct EventStream {
    body: BoxStream<'static, reqwest::Result<Vec<u8>>>,
    buffer: String,
    decoder: SseDecoder,
}

impl EventStream {
    pub async fn next_event(&mut self) -> SseEvent {
        tokio::time::timeout(WAIT, self.read_event())
            .await
            .expect("no event within timeout")
    }

    /// Next event that is not a keep-alive `ping`.
    pub async fn next_non_ping(&mut self) -> SseEvent {
        loop {
            let event = self.next_event().await;
            if event.event.as_deref() != Some("ping") {
                return event;
            }
        }
    }

    async fn read_event(&mut self) -> SseEvent {
        loop {
            while let Some(pos) = self.buffer.find('\n') {
                let line: String = self.buffer.drain(..=pos).collect();
                if let Some(event) = self.decoder.push_line(line.trim_end_matches('\n')) {
                    return event;
                }
            }

            let chunk = self
                .body
                .next()
                .await
                .expect("event stream ended")
                .expect("event stream failed");
            self.buffer.push_str(&String::from_utf8_lossy(&chunk));
        }
    }
}
