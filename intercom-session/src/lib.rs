mod call;
mod config;
mod error;
mod media;
mod peer;
mod signaling;

pub use call::*;
pub use config::*;
pub use error::*;
pub use media::*;
pub use peer::*;
pub use signaling::*;

pub use intercom_core::model::*;
