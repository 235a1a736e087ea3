use anyhow::{Context, Result};
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

use crate::hub::SignalHub;
use crate::http::router;

pub const DEFAULT_BIND: &str = "0.0.0.0:3000";
pub const DEFAULT_KEEP_ALIVE_SECS: u64 = 25;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind: SocketAddr,
    /// Interval between `ping` events on each open stream.
    pub keep_alive: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            keep_alive: Duration::from_secs(DEFAULT_KEEP_ALIVE_SECS),
        }
    }
}

/// The signaling relay, bound and ready to serve.
pub struct RelayServer {
    listener: TcpListener,
    hub: SignalHub,
    keep_alive: Duration,
}

impl RelayServer {
    pub async fn bind(config: RelayConfig) -> Result<Self> {
        let listener = TcpListener::bind(config.bind)
            .await
            .with_context(|| format!("failed to bind relay to {}", config.bind))?;

        Ok(Self {
            listener,
            hub: SignalHub::new(),
            keep_alive: config.keep_alive,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn hub(&self) -> SignalHub {
        self.hub.clone()
    }

    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Serve until `shutdown` resolves.
    pub async fn run_until(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
        let addr = self.local_addr()?;
        info!("Signaling relay listening on http://{}", addr);

        let app = router(self.hub, self.keep_alive);
        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .context("relay server failed")?;

        info!("Signaling relay on {} stopped", addr);
        Ok(())
    }
}
