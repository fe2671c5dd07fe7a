use futures::{Stream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::domain::ports::EventPublisher;

/// Typed fan-out built on `tokio::sync::broadcast`.
/// Bounded: subscribers that lag lose the oldest events.
#[derive(Clone)]
pub struct EventBroadcaster<T> {
    tx: broadcast::Sender<T>,
}

impl<T: Clone + Send + 'static> EventBroadcaster<T> {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// No subscribers is not an error.
    pub fn send(&self, value: T) {
        let _ = self.tx.send(value);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.tx.subscribe()
    }

    /// Typed stream of events; lag errors are filtered out.
    pub fn subscribe_stream(&self) -> impl Stream<Item = T> {
        BroadcastStream::new(self.tx.subscribe()).filter_map(|res| async move { res.ok() })
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<T: Clone + Send + Sync + 'static> EventPublisher<T> for EventBroadcaster<T> {
    fn publish(&self, event: &T) {
        self.send(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_subscriber_sees_each_event() {
        let hub = EventBroadcaster::<u32>::new(8);
        let mut a = hub.subscribe();
        let mut b = hub.subscribe();
        hub.publish(&7);
        assert_eq!(a.recv().await.unwrap(), 7);
        assert_eq!(b.recv().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn lagging_stream_skips_dropped_events() {
        let hub = EventBroadcaster::<u32>::new(2);
        let stream = hub.subscribe_stream();
        for i in 0..5 {
            hub.send(i);
        }
        drop(hub);
        let got: Vec<u32> = stream.collect().await;
        assert_eq!(got, vec![3, 4]);
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let hub = EventBroadcaster::<&'static str>::new(1);
        hub.publish(&"nobody listening");
        assert_eq!(hub.receiver_count(), 0);
    }
}
