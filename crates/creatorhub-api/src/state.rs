use std::sync::Arc;

use creatorhub_assist::Assistant;
use creatorhub_realtime::{DeliverySimulator, Dispatcher};
use creatorhub_store::Store;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Arc<Store>,
    pub dispatcher: Dispatcher,
    pub delivery: DeliverySimulator,
    pub assistant: Assistant,
}
