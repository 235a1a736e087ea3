pub use intercom_core::model::*;

pub mod model {
    pub use intercom_core::model::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use intercom_session::*;
}

#[cfg(feature = "relay")]
pub mod relay {
    pub use intercom_relay::*;
}
