//! Server-Sent Events adapter for brief streams.

use std::convert::Infallible;
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::warn;

use crate::types::StreamEvent;

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Encode one stream event as an SSE frame named after its type.
pub fn to_sse_event(event: &StreamEvent) -> Event {
    let data = serde_json::to_string(event).unwrap_or_else(|e| {
        warn!(error = %e, "failed to serialize stream event");
        r#"{"type":"error","error":"internal error","kind":"parse"}"#.to_string()
    });
    Event::default().event(event.name()).data(data)
}

/// SSE response over a relay's receiver. When the client disconnects the
/// body is dropped, which drops the receiver and stops the relay.
pub fn event_stream_response(
    events: mpsc::Receiver<StreamEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send> {
    let stream =
        ReceiverStream::new(events).map(|event| Ok::<_, Infallible>(to_sse_event(&event)));
    Sse::new(stream).keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL))
}
