use desk_logging::desk_warn;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

/// Typed publish/subscribe channel between components.
///
/// A subscriber stays registered exactly as long as its [`Subscription`] lives.
#[derive(Debug)]
pub struct EventBus<T> {
    tx: broadcast::Sender<T>,
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> EventBus<T> {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Returns how many subscribers the event reached.
    pub fn publish(&self, event: T) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Drop to unsubscribe.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: broadcast::Receiver<T>,
}

impl<T: Clone> Subscription<T> {
    /// Next event, or `None` once every publisher is gone.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    desk_warn!("bus: subscriber lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    pub fn try_recv(&mut self) -> Option<T> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    desk_warn!("bus: subscriber lagged, skipped {} events", skipped);
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_subscription_stops_receiving() {
        let bus: EventBus<u32> = EventBus::new(8);
        let mut first = bus.subscribe();
        let second = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(second);
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(bus.publish(7), 1);
        assert_eq!(first.try_recv(), Some(7));
        assert_eq!(first.try_recv(), None);
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let bus: EventBus<&'static str> = EventBus::new(4);
        assert_eq!(bus.publish("nobody"), 0);
        let mut late = bus.subscribe();
        assert_eq!(late.try_recv(), None);
    }

    #[test]
    fn lagging_subscriber_skips_to_newest() {
        let bus: EventBus<u32> = EventBus::new(2);
        let mut sub = bus.subscribe();
        for n in 0..5 {
            bus.publish(n);
        }
        assert_eq!(sub.try_recv(), Some(3));
        assert_eq!(sub.try_recv(), Some(4));
    }
}
