pub mod error;
pub mod mutations;
pub mod queries;
pub mod seed;

use std::sync::{Mutex, PoisonError};

use creatorhub_types::models::{Creator, Message, Post, Transaction, User};
use tracing::info;

pub use error::{StoreError, StoreResult};

/// The five collections owned by a [`Store`]. New posts and messages are
/// stored at the front, so on equal timestamps the later insert comes first.
/// Display order is decided at read time.
#[derive(Debug, Clone, Default)]
pub struct PlatformState {
    pub users: Vec<User>,
    pub creators: Vec<Creator>,
    pub posts: Vec<Post>,
    pub messages: Vec<Message>,
    pub transactions: Vec<Transaction>,
}

/// In-memory platform state. Every public operation takes the lock once
/// and runs to completion, so no caller observes a half-applied mutation.
pub struct Store {
    state: Mutex<PlatformState>,
}

impl Store {
    /// Build a store over explicit fixtures.
    pub fn new(state: PlatformState) -> Self {
        info!(
            "Store ready: {} users, {} creators, {} posts, {} messages",
            state.users.len(),
            state.creators.len(),
            state.posts.len(),
            state.messages.len()
        );
        Self {
            state: Mutex::new(state),
        }
    }

    /// Build a store over the demo fixtures.
    pub fn seeded() -> Self {
        Self::new(seed::fixtures())
    }

    /// Drop all state and restore the demo fixtures.
    pub fn reset(&self) {
        self.with_state_mut(|state| *state = seed::fixtures());
        info!("Store reset to seed fixtures");
    }

    fn with_state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&PlatformState) -> T,
    {
        // Mutations validate before writing, so a poisoned lock still holds
        // consistent state.
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    fn with_state_mut<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut PlatformState) -> T,
    {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::seeded()
    }
}
