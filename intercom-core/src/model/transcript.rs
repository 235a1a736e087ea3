use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::now_millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSender {
    Local,
    Remote,
}

/// One line of the in-call chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub id: String,
    pub sender: ChatSender,
    pub text: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl ChatEntry {
    pub fn new(sender: ChatSender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender,
            text: text.into(),
            timestamp: now_millis(),
        }
    }

    pub fn local(text: impl Into<String>) -> Self {
        Self::new(ChatSender::Local, text)
    }

    pub fn remote(text: impl Into<String>) -> Self {
        Self::new(ChatSender::Remote, text)
    }
}
