mod chat_link;
mod peer_event;
mod peer_session;
mod rtc_peer;

pub use chat_link::*;
pub use peer_event::*;
pub use peer_session::*;
pub use rtc_peer::*;
