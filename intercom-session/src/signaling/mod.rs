mod local_bus;
mod relay_transport;
mod routing;
mod signal_channel;
mod signal_transport;
mod sse;

pub use local_bus::*;
pub use relay_transport::*;
pub use routing::*;
pub use signal_channel::*;
pub use signal_transport::*;
pub use sse::*;
