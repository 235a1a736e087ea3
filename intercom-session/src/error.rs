use std::path::PathBuf;

/// Failures of the operations exposed by [`crate::CallSession`].
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error("unable to start call: {0}")]
    Start(#[source] CallFailure),

    #[error("unable to share screen: {0}")]
    ScreenShare(#[source] CallFailure),

    #[error("no counterpart selected")]
    NoCounterpart,

    #[error("a call is already in progress")]
    CallInProgress,

    #[error("call session is closed")]
    Closed,
}

/// Root cause behind a rejected call operation.
#[derive(Debug, thiserror::Error)]
pub enum CallFailure {
    #[error(transparent)]
    Media(#[from] MediaError),

    #[error("negotiation failed: {0:#}")]
    Negotiation(#[from] anyhow::Error),

    #[error("no outgoing video sender")]
    NoVideoSender,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaError {
    #[error("permission to capture media was denied")]
    PermissionDenied,

    #[error("media device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("captured stream has no video track")]
    NoVideoTrack,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("relay request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to encode signal: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("signal stream read failed: {0}")]
    Stream(#[from] std::io::Error),

    #[error("signal transport closed")]
    Closed,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
