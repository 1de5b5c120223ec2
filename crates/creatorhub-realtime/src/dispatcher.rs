use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};

use creatorhub_types::events::PlatformEvent;

/// Fans platform events out to every subscriber and tracks who is typing
/// to whom.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    /// Broadcast channel for platform events; every subscriber receives every event
    broadcast_tx: broadcast::Sender<PlatformEvent>,

    /// Active typing indicators as (from_id, to_id)
    typing: RwLock<HashSet<(String, String)>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let (broadcast_tx, _) = broadcast::channel(1024);
        Self {
            inner: Arc::new(DispatcherInner {
                broadcast_tx,
                typing: RwLock::new(HashSet::new()),
            }),
        }
    }

    /// Subscribe to platform events. Returns a broadcast receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.inner.broadcast_tx.subscribe()
    }

    /// Broadcast an event. Having no subscribers is not an error.
    pub fn broadcast(&self, event: PlatformEvent) {
        let _ = self.inner.broadcast_tx.send(event);
    }

    /// Raise the typing flag for `from_id` in its conversation with `to_id`.
    pub async fn start_typing(&self, from_id: &str, to_id: &str) {
        let inserted = self
            .inner
            .typing
            .write()
            .await
            .insert((from_id.to_string(), to_id.to_string()));

        if inserted {
            self.broadcast(PlatformEvent::TypingStart {
                from_id: from_id.to_string(),
                to_id: to_id.to_string(),
            });
        }
    }

    pub async fn stop_typing(&self, from_id: &str, to_id: &str) {
        let removed = self
            .inner
            .typing
            .write()
            .await
            .remove(&(from_id.to_string(), to_id.to_string()));

        if removed {
            self.broadcast(PlatformEvent::TypingStop {
                from_id: from_id.to_string(),
                to_id: to_id.to_string(),
            });
        }
    }

    /// Drop every typing flag raised by `from_id`, broadcasting a stop for
    /// each. Called when the user's connection goes away.
    pub async fn clear_typing_from(&self, from_id: &str) {
        let cleared: Vec<String> = {
            let mut typing = self.inner.typing.write().await;
            let targets: Vec<String> = typing
                .iter()
                .filter(|(from, _)| from == from_id)
                .map(|(_, to)| to.clone())
                .collect();
            for to in &targets {
                typing.remove(&(from_id.to_string(), to.clone()));
            }
            targets
        };

        for to_id in cleared {
            self.broadcast(PlatformEvent::TypingStop {
                from_id: from_id.to_string(),
                to_id,
            });
        }
    }

    pub async fn is_typing(&self, from_id: &str, to_id: &str) -> bool {
        self.inner
            .typing
            .read()
            .await
            .contains(&(from_id.to_string(), to_id.to_string()))
    }

    /// Counterparts currently typing to `user_id`.
    pub async fn typing_status(&self, user_id: &str) -> HashMap<String, bool> {
        self.inner
            .typing
            .read()
            .await
            .iter()
            .filter(|(_, to)| to == user_id)
            .map(|(from, _)| (from.clone(), true))
            .collect()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
