use std::path::Path;
use std::time::Duration;

use intercom_core::IceServerConfig;
use intercom_core::utils::default_stun_urls;
use serde::Deserialize;

use crate::error::ConfigError;

/// Settings for a call session.
///
/// Loaded from TOML, for example:
///
/// ```toml
/// negotiation_timeout_ms = 20000
///
/// [[turn]]
/// urls = ["turn:turn.example.org:3478"]
/// username = "alice"
/// credential = "secret"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Public STUN servers used for address discovery.
    pub stun_urls: Vec<String>,

    /// Optional TURN relays, passed through to the peer connection as-is.
    pub turn: Vec<IceServerConfig>,

    /// How long Offering/Answering may last before the attempt is abandoned.
    pub negotiation_timeout_ms: u64,

    /// Label of the chat data channel created by the caller.
    pub chat_label: String,

    /// Pause before the signal subscription is re-established after it drops.
    pub resubscribe_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stun_urls: default_stun_urls(),
            turn: Vec::new(),
            negotiation_timeout_ms: 30_000,
            chat_label: "chat".to_owned(),
            resubscribe_delay_ms: 1_000,
        }
    }
}

impl SessionConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// ICE servers handed to the peer connection: STUN first, then any TURN relays.
    pub fn ice_servers(&self) -> Vec<IceServerConfig> {
        let mut servers = Vec::with_capacity(1 + self.turn.len());
        if !self.stun_urls.is_empty() {
            servers.push(IceServerConfig::stun(self.stun_urls.clone()));
        }
        servers.extend(self.turn.iter().cloned());
        servers
    }

    pub fn negotiation_timeout(&self) -> Duration {
        Duration::from_millis(self.negotiation_timeout_ms)
    }

    pub fn resubscribe_delay(&self) -> Duration {
        Duration::from_millis(self.resubscribe_delay_ms)
    }
}
