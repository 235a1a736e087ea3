use axum::extract::State;
use axum::response::sse::{Event, Sse};
use futures::Stream;
use futures::stream::{self, StreamExt};
use intercom_core::utils::now_millis;
use std::convert::Infallible;
use tokio::time::{Instant, Interval, interval_at};

use crate::hub::Subscription;
use crate::http::RelayState;

/// `GET /api/signaling`: an event stream of everything published from now on.
///
/// Opens with `event: open`, then one unnamed event per payload. A `ping`
/// event goes out every keep-alive interval until the client goes away.
pub async fn sse_handler(
    State(state): State<RelayState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = state.hub.subscribe();
    let ping = interval_at(Instant::now() + state.keep_alive, state.keep_alive);

    let open = Event::default().event("open").data("\"ok\"");
    let updates = stream::unfold((subscription, ping), next_event);

    Sse::new(stream::once(async move { Ok(open) }).chain(updates))
}

async fn next_event(
    (mut subscription, mut ping): (Subscription, Interval),
) -> Option<(Result<Event, Infallible>, (Subscription, Interval))> {
    let event = tokio::select! {
        payload = subscription.recv() => Event::default().data(payload?),
        _ = ping.tick() => Event::default().event("ping").data(now_millis().to_string()),
    };
    Some((Ok(event), (subscription, ping)))
}
