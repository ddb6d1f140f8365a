//! Live document-change stream (SSE).

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use futures::stream::Stream;

use crate::state::AppState;

/// Subscribe to lifecycle events. Each connected client holds one
/// broadcaster subscription; dropping the stream on disconnect
/// unsubscribes it, and a half-open connection is pruned by the
/// broadcaster on its next failed push.
pub async fn document_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = state.broadcaster.subscribe();
    tracing::debug!(subscriber_id = %subscription.id(), "Event stream opened");

    let stream = futures::stream::unfold(subscription, |mut subscription| async move {
        let change = subscription.recv().await?;
        let event = Event::default()
            .event(change.name())
            .json_data(&change)
            .unwrap_or_else(|error| {
                tracing::warn!(%error, "Failed to encode change event");
                Event::default().comment("encoding error")
            });
        Some((Ok(event), subscription))
    });

    Sse::new(stream)
}
