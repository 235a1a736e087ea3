mod actor;
mod call_command;
mod call_session;
mod call_state;
mod pending;

pub use call_session::*;
pub use call_state::*;
pub use pending::*;
