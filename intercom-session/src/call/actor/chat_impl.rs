use intercom_core::ChatEntry;
use tracing::{debug, trace};

use crate::call::actor::CallActor;

impl CallActor {
    pub(super) async fn send_message(&mut self, text: String) {
        if text.trim().is_empty() {
            return;
        }
        let Some(chat) = self.session.as_ref().and_then(|s| s.chat.clone()) else {
            trace!("No data channel, dropping chat message");
            return;
        };
        if !chat.is_open() {
            trace!("Data channel '{}' not open, dropping chat message", chat.label());
            return;
        }

        if let Err(e) = chat.send_text(&text).await {
            debug!("Failed to send chat message: {:?}", e);
            return;
        }
        self.state.messages.push(ChatEntry::local(text));
        self.publish_state();
    }

    pub(super) fn on_chat_message(&mut self, text: String) {
        self.state.messages.push(ChatEntry::remote(text));
        self.publish_state();
    }
}
