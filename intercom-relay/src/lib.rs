mod hub;
mod http;
mod server;

pub use hub::*;
pub use http::*;
pub use server::*;
