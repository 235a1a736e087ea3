mod signal_hub;

pub use signal_hub::*;
