mod publish_handler;
mod sse_handler;

pub use publish_handler::*;
pub use sse_handler::*;

use axum::Router;
use axum::routing::get;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

use crate::hub::SignalHub;

/// Path of the publish/subscribe endpoint.
pub const SIGNALING_ROUTE: &str = "/api/signaling";

#[derive(Clone)]
pub struct RelayState {
    pub hub: SignalHub,
    pub keep_alive: Duration,
}

/// Routes of the relay. Any origin may publish and subscribe.
pub fn router(hub: SignalHub, keep_alive: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(SIGNALING_ROUTE, get(sse_handler).post(publish_handler))
        .layer(cors)
        .with_state(RelayState { hub, keep_alive })
}
