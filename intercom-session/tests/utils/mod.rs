pub mod mock_devices;

pub use mock_devices::*;
pub use mock_peer::*;
pub use signal_helpers::*;
