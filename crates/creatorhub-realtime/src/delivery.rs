use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use creatorhub_store::Store;
use creatorhub_types::events::PlatformEvent;
use creatorhub_types::models::{DeliveryStatus, Message};

use crate::Dispatcher;

pub const DEFAULT_FAILURE_RATE: f64 = 0.2;

/// Sends messages whose delivery receipt arrives after a fixed delay.
///
/// The receipt is `sent`, or `failed` with probability `failure_rate`.
/// Failed messages are not retried.
#[derive(Clone)]
pub struct DeliverySimulator {
    store: Arc<Store>,
    dispatcher: Dispatcher,
    delay: Duration,
    failure_rate: f64,
    rng: Arc<Mutex<StdRng>>,
}

impl DeliverySimulator {
    pub fn new(
        store: Arc<Store>,
        dispatcher: Dispatcher,
        delay: Duration,
        failure_rate: f64,
        seed: u64,
    ) -> Self {
        let failure_rate = if (0.0..=1.0).contains(&failure_rate) {
            failure_rate
        } else {
            warn!(
                "Delivery failure rate {} out of range, using {}",
                failure_rate, DEFAULT_FAILURE_RATE
            );
            DEFAULT_FAILURE_RATE
        };
        Self {
            store,
            dispatcher,
            delay,
            failure_rate,
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    /// Append a `sending` message and schedule its receipt. The receipt task
    /// is fire-and-forget.
    pub fn send(&self, from_id: &str, to_id: &str, text: &str) -> Message {
        let message = self.store.send_tracked_message(from_id, to_id, text);
        self.dispatcher.broadcast(PlatformEvent::MessageCreate {
            message: message.clone(),
        });

        let outcome = if self.roll_failure() {
            DeliveryStatus::Failed
        } else {
            DeliveryStatus::Sent
        };

        let store = self.store.clone();
        let dispatcher = self.dispatcher.clone();
        let delay = self.delay;
        let message_id = message.id.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if store.resolve_delivery(&message_id, outcome) {
                debug!("Message {} delivery: {:?}", message_id, outcome);
                dispatcher.broadcast(PlatformEvent::MessageStatus {
                    message_id,
                    status: outcome,
                });
            }
        });

        message
    }

    fn roll_failure(&self) -> bool {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_bool(self.failure_rate)
    }
}

#[cfg(test)]
mod tests {
    use creatorhub_store::seed::FAN_ID;

    use super::*;

    const DELAY: Duration = Duration::from_millis(1000);

    fn status_of(store: &Store, id: &str) -> Option<DeliveryStatus> {
        store.messages().into_iter().find(|m| m.id == id)?.status
    }

    #[tokio::test(start_paused = true)]
    async fn receipt_arrives_after_delay() {
        let store = Arc::new(Store::seeded());
        let dispatcher = Dispatcher::new();
        let mut rx = dispatcher.subscribe();
        let sim = DeliverySimulator::new(store.clone(), dispatcher, DELAY, 0.0, 7);

        let msg = sim.send(FAN_ID, "creator-1", "hello");
        assert_eq!(status_of(&store, &msg.id), Some(DeliveryStatus::Sending));

        tokio::time::sleep(DELAY + Duration::from_millis(1)).await;
        assert_eq!(status_of(&store, &msg.id), Some(DeliveryStatus::Sent));

        assert!(matches!(rx.recv().await.unwrap(), PlatformEvent::MessageCreate { .. }));
        assert_eq!(
            rx.recv().await.unwrap(),
            PlatformEvent::MessageStatus {
                message_id: msg.id,
                status: DeliveryStatus::Sent
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failed_receipt_is_terminal() {
        let store = Arc::new(Store::seeded());
        let sim = DeliverySimulator::new(store.clone(), Dispatcher::new(), DELAY, 1.0, 7);

        let msg = sim.send(FAN_ID, "creator-1", "hello");
        tokio::time::sleep(DELAY * 2).await;

        assert_eq!(status_of(&store, &msg.id), Some(DeliveryStatus::Failed));
        assert!(!store.resolve_delivery(&msg.id, DeliveryStatus::Sent));
    }

    #[tokio::test]
    async fn out_of_range_rate_falls_back_to_default() {
        let sim = DeliverySimulator::new(
            Arc::new(Store::seeded()),
            Dispatcher::new(),
            DELAY,
            f64::NAN,
            1,
        );
        assert_eq!(sim.failure_rate, DEFAULT_FAILURE_RATE);
    }
}
