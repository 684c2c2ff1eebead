use std::{borrow::Cow, convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tracing::{error, warn};

const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Fan-out of job events to every open SSE connection.
/// A subscriber that falls more than `capacity` events behind skips the oldest ones.
#[derive(Clone)]
pub struct SseBroadcaster<T> {
    tx: broadcast::Sender<T>,
}

impl<T: Clone + Send + 'static> SseBroadcaster<T> {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Returns the number of connections that will see `value`.
    pub fn send(&self, value: T) -> usize {
        self.tx.send(value).unwrap_or(0)
    }

    /// Raw receiver, used as the change trigger of calendar feeds.
    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.tx.subscribe()
    }

    pub fn subscribe_stream(&self) -> impl Stream<Item = T> {
        BroadcastStream::new(self.tx.subscribe()).filter_map(|res| async move {
            match res {
                Ok(value) => Some(value),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    warn!(skipped, "SSE subscriber lagged, events dropped");
                    None
                }
            }
        })
    }
}

/// Named SSE response over `stream` with JSON payloads and keepalive comments.
pub fn named_sse<T, S>(
    stream: S,
    event_name: impl Into<Cow<'static, str>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
    T: Serialize + Send + 'static,
    S: Stream<Item = T> + Send + 'static,
{
    let event_name = event_name.into();
    let events = stream.filter_map(move |msg| {
        let event = Event::default().event(event_name.as_ref()).json_data(&msg);
        let event = match event {
            Ok(event) => Some(Ok(event)),
            Err(e) => {
                error!(event = %event_name, error = %e, "Dropping unserializable SSE payload");
                None
            }
        };
        futures::future::ready(event)
    });
    Sse::new(events).keep_alive(KeepAlive::new().interval(KEEPALIVE_INTERVAL).text("keepalive"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_messages_sent_after_subscribing() {
        let sse = SseBroadcaster::<u32>::new(8);
        assert_eq!(sse.send(1), 0);

        let mut stream = Box::pin(sse.subscribe_stream());
        assert_eq!(sse.send(2), 1);
        sse.send(3);

        assert_eq!(stream.next().await, Some(2));
        assert_eq!(stream.next().await, Some(3));
    }

    #[tokio::test]
    async fn broadcast_stream_is_served_as_named_events() {
        use axum::response::IntoResponse;

        let sse = SseBroadcaster::<u32>::new(8);
        let response = named_sse(sse.subscribe_stream(), "numbers").into_response();
        sse.send(7);

        assert_eq!(response.headers()["content-type"], "text/event-stream");
        let mut body = response.into_body().into_data_stream();
        let chunk = body.next().await.unwrap().unwrap();
        let text = String::from_utf8_lossy(&chunk);
        assert!(text.contains("event: numbers\n"), "{text}");
        assert!(text.contains("data: 7\n"), "{text}");
    }

    #[tokio::test]
    async fn lagging_subscriber_skips_oldest() {
        let sse = SseBroadcaster::<u32>::new(2);
        let mut stream = Box::pin(sse.subscribe_stream());
        for n in 1..=4 {
            sse.send(n);
        }

        assert_eq!(stream.next().await, Some(3));
        assert_eq!(stream.next().await, Some(4));
    }
}
