use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use creatorhub_store::Store;
use creatorhub_types::events::PlatformEvent;
use creatorhub_types::models::{Creator, Message};

use crate::Dispatcher;

#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Time between simulated incoming messages.
    pub interval: Duration,
    /// How long the typing indicator stays up before the message lands.
    pub typing_duration: Duration,
    pub seed: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(8),
            typing_duration: Duration::from_secs(3),
            seed: 2025,
        }
    }
}

/// Makes the demo feel alive: periodically one of a fan's followed creators
/// "types" for a moment and then sends the fan a message.
pub struct IncomingSimulator {
    store: Arc<Store>,
    dispatcher: Dispatcher,
    config: SimulatorConfig,
    rng: StdRng,
    /// Typing flag currently raised by a tick, as (from_id, to_id).
    typing: Option<(String, String)>,
}

impl IncomingSimulator {
    pub fn new(store: Arc<Store>, dispatcher: Dispatcher, config: SimulatorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            store,
            dispatcher,
            config,
            rng,
            typing: None,
        }
    }

    /// Run one simulation step. Returns the appended message, or `None` when
    /// no fan follows an existing creator.
    pub async fn tick(&mut self) -> Option<Message> {
        let (fan_id, creator) = self.pick_pair()?;

        self.dispatcher.start_typing(&creator.id, &fan_id).await;
        self.typing = Some((creator.id.clone(), fan_id.clone()));
        if !self.config.typing_duration.is_zero() {
            tokio::time::sleep(self.config.typing_duration).await;
        }
        self.lower_typing().await;

        let text = format!("This is a new message from {}!", creator.name);
        let message = self.store.send_message(&creator.id, &fan_id, &text);
        self.dispatcher.broadcast(PlatformEvent::MessageCreate {
            message: message.clone(),
        });
        Some(message)
    }

    async fn lower_typing(&mut self) {
        if let Some((from_id, to_id)) = self.typing.take() {
            self.dispatcher.stop_typing(&from_id, &to_id).await;
        }
    }

    fn pick_pair(&mut self) -> Option<(String, Creator)> {
        let users = self.store.users();
        let fans: Vec<_> = users
            .iter()
            .filter(|u| u.role.is_fan() && !u.subscribed_to.is_empty())
            .collect();
        let fan = fans.choose(&mut self.rng)?;
        let creator_id = fan.subscribed_to.choose(&mut self.rng)?;
        // A dangling subscription simply skips this round.
        let creator = self.store.get_creator_by_id(creator_id)?;
        Some((fan.id.clone(), creator))
    }

    /// Start the periodic loop on the runtime. The first message arrives one
    /// interval after start.
    pub fn spawn(self) -> SimulatorHandle {
        let token = CancellationToken::new();
        let handle = tokio::spawn(self.run(token.clone()));
        SimulatorHandle { token, handle }
    }

    async fn run(mut self, token: CancellationToken) {
        info!(
            "Incoming message simulator started (every {:?})",
            self.config.interval
        );
        let mut interval = tokio::time::interval(self.config.interval);
        // A tick that overruns the period pushes the schedule back.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = interval.tick() => {}
            }

            let cancelled = tokio::select! {
                _ = token.cancelled() => true,
                message = self.tick() => {
                    if let Some(message) = message {
                        debug!("Simulated message {} -> {}", message.from_id, message.to_id);
                    }
                    false
                }
            };
            if cancelled {
                // Cancelled mid-tick; do not leave the indicator up.
                self.lower_typing().await;
                break;
            }
        }
        info!("Incoming message simulator stopped");
    }
}

/// Owner of a running simulator. Dropping the handle does not stop the
/// task; call [`SimulatorHandle::shutdown`].
pub struct SimulatorHandle {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl SimulatorHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Cancel the loop and wait for it to exit.
    pub async fn shutdown(self) {
        self.token.cancel();
        let _ = self.handle.await;
    }
}
