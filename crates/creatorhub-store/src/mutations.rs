use chrono::Utc;
use creatorhub_types::models::{
    Creator, CreatorProfileUpdate, DeliveryStatus, Message, Post, PostEdit, Transaction,
    TransactionType, User, UserProfileUpdate,
};
use creatorhub_types::{Cents, new_id};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::{PlatformState, Store};

impl Store {
    // -- Subscriptions --

    /// Subscribe `user_id` to `creator_id` if the access code matches and the
    /// user can pay the subscription price. All-or-nothing: on `Err` nothing
    /// changed. Returns the updated user.
    pub fn subscribe_creator(
        &self,
        user_id: &str,
        creator_id: &str,
        access_code: &str,
    ) -> StoreResult<User> {
        let result = self.with_state_mut(|state| {
            let creator = state
                .creator(creator_id)
                .ok_or_else(|| StoreError::CreatorNotFound(creator_id.to_string()))?;
            let price = creator.subscription_price;
            let description = format!("Subscription to {}", creator.name);
            let code_ok = creator.access_code_matches(access_code);

            let user = state
                .user(user_id)
                .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))?;
            if user.is_subscribed_to(creator_id) {
                return Err(StoreError::AlreadySubscribed(creator_id.to_string()));
            }
            if !code_ok {
                return Err(StoreError::InvalidAccessCode);
            }
            check_funds(user, price)?;

            // Validated; apply every effect.
            let user = apply_debit(state, user_id, price)?;
            user.subscribed_to.push(creator_id.to_string());
            let updated = user.clone();

            state.transactions.push(Transaction {
                id: new_id("t"),
                user_id: user_id.to_string(),
                kind: TransactionType::Subscription,
                amount: debit_amount(price),
                description,
                timestamp: Utc::now(),
                related_creator_id: Some(creator_id.to_string()),
                related_post_id: None,
            });
            Ok(updated)
        });

        match &result {
            Ok(_) => debug!("{} subscribed to {}", user_id, creator_id),
            Err(e) => warn!("Subscribe {} -> {} rejected: {}", user_id, creator_id, e),
        }
        result
    }

    /// Remove a subscription. Unfollowing a creator the user does not follow
    /// is a no-op. Returns whether anything was removed.
    pub fn unfollow_creator(&self, user_id: &str, creator_id: &str) -> bool {
        self.with_state_mut(|state| {
            let Some(user) = state.user_mut(user_id) else {
                return false;
            };
            let before = user.subscribed_to.len();
            user.subscribed_to.retain(|id| id != creator_id);
            before != user.subscribed_to.len()
        })
    }

    // -- Tips --

    /// Move `amount` from the fan's balance onto the post's tip counter.
    /// Returns the updated fan so callers can refresh cached copies.
    pub fn tip_post(&self, fan_id: &str, post_id: &str, amount: Cents) -> StoreResult<User> {
        if amount == 0 {
            return Err(StoreError::InvalidAmount);
        }

        let result = self.with_state_mut(|state| {
            let post = state
                .posts
                .iter()
                .find(|p| p.id == post_id)
                .ok_or_else(|| StoreError::PostNotFound(post_id.to_string()))?;
            let creator_id = post.creator_id.clone();
            let description = match state.creator(&creator_id) {
                Some(creator) => format!("Tip for {}", creator.name),
                None => "Tip".to_string(),
            };

            let fan = state
                .user(fan_id)
                .ok_or_else(|| StoreError::UserNotFound(fan_id.to_string()))?;
            check_funds(fan, amount)?;

            let updated = apply_debit(state, fan_id, amount)?.clone();
            if let Some(post) = state.post_mut(post_id) {
                post.tips += amount;
            }
            state.transactions.push(Transaction {
                id: new_id("t"),
                user_id: fan_id.to_string(),
                kind: TransactionType::Tip,
                amount: debit_amount(amount),
                description,
                timestamp: Utc::now(),
                related_creator_id: Some(creator_id),
                related_post_id: Some(post_id.to_string()),
            });
            Ok(updated)
        });

        match &result {
            Ok(_) => debug!("{} tipped {} on {}", fan_id, amount, post_id),
            Err(e) => warn!("Tip {} on {} rejected: {}", fan_id, post_id, e),
        }
        result
    }

    // -- Posts --

    /// Publish a new post with zeroed engagement counters.
    pub fn add_post(
        &self,
        creator_id: &str,
        text: &str,
        image_url: Option<String>,
        is_private: bool,
    ) -> StoreResult<Post> {
        self.with_state_mut(|state| {
            if state.creator(creator_id).is_none() {
                return Err(StoreError::CreatorNotFound(creator_id.to_string()));
            }
            let post = Post {
                id: new_id("p"),
                creator_id: creator_id.to_string(),
                text: text.to_string(),
                image_url,
                timestamp: Utc::now(),
                likes: 0,
                comments: 0,
                tips: 0,
                is_private,
            };
            state.posts.insert(0, post.clone());
            debug!("Post {} added by {}", post.id, creator_id);
            Ok(post)
        })
    }

    /// Replace text, image and privacy of a post. Unknown ids are ignored.
    pub fn update_post(&self, post_id: &str, edit: PostEdit) -> Option<Post> {
        self.with_state_mut(|state| {
            let post = state.post_mut(post_id)?;
            post.text = edit.text;
            post.image_url = edit.image_url;
            post.is_private = edit.is_private;
            Some(post.clone())
        })
    }

    /// Delete a post. Deleting an unknown or already-deleted post is a no-op.
    pub fn remove_post(&self, post_id: &str) -> bool {
        self.with_state_mut(|state| {
            let before = state.posts.len();
            state.posts.retain(|p| p.id != post_id);
            before != state.posts.len()
        })
    }

    // -- Creators & users --

    /// Flip the verified badge. Returns the new value, or `None` for an
    /// unknown creator.
    pub fn toggle_creator_verification(&self, creator_id: &str) -> Option<bool> {
        self.with_state_mut(|state| {
            let creator = state.creator_mut(creator_id)?;
            creator.is_verified = !creator.is_verified;
            debug!("Creator {} verified={}", creator_id, creator.is_verified);
            Some(creator.is_verified)
        })
    }

    pub fn update_creator_access_code(&self, creator_id: &str, access_code: &str) -> bool {
        self.with_state_mut(|state| match state.creator_mut(creator_id) {
            Some(creator) => {
                creator.access_code = access_code.to_string();
                true
            }
            None => false,
        })
    }

    /// Shallow-merge profile fields. Handles stay unique across creators.
    pub fn update_creator_profile(
        &self,
        creator_id: &str,
        update: CreatorProfileUpdate,
    ) -> StoreResult<Option<Creator>> {
        self.with_state_mut(|state| {
            if state.creator(creator_id).is_none() {
                return Ok(None);
            }
            if let Some(handle) = &update.handle {
                let taken = state
                    .creators
                    .iter()
                    .any(|c| c.id != creator_id && c.handle.eq_ignore_ascii_case(handle));
                if taken {
                    return Err(StoreError::HandleTaken(handle.clone()));
                }
            }

            let Some(creator) = state.creator_mut(creator_id) else {
                return Ok(None);
            };
            if let Some(name) = update.name {
                creator.name = name;
            }
            if let Some(handle) = update.handle {
                creator.handle = handle;
            }
            if let Some(bio) = update.bio {
                creator.bio = bio;
            }
            if let Some(avatar_url) = update.avatar_url {
                creator.avatar_url = avatar_url;
            }
            if let Some(banner_url) = update.banner_url {
                creator.banner_url = banner_url;
            }
            if let Some(price) = update.subscription_price {
                creator.subscription_price = price;
            }
            Ok(Some(creator.clone()))
        })
    }

    pub fn update_user_profile(&self, user_id: &str, update: UserProfileUpdate) -> Option<User> {
        self.with_state_mut(|state| {
            let user = state.user_mut(user_id)?;
            if let Some(name) = update.name {
                user.name = name;
            }
            if let Some(avatar_url) = update.avatar_url {
                user.avatar_url = avatar_url;
            }
            if let Some(bio) = update.bio {
                user.bio = Some(bio);
            }
            Some(user.clone())
        })
    }

    // -- Messaging --

    /// Append an unread message without delivery tracking.
    pub fn send_message(&self, from_id: &str, to_id: &str, text: &str) -> Message {
        self.append_message(from_id, to_id, text, None)
    }

    /// Append an unread message whose delivery starts in `sending`; the
    /// outcome is settled later through [`Store::resolve_delivery`].
    pub fn send_tracked_message(&self, from_id: &str, to_id: &str, text: &str) -> Message {
        self.append_message(from_id, to_id, text, Some(DeliveryStatus::Sending))
    }

    fn append_message(
        &self,
        from_id: &str,
        to_id: &str,
        text: &str,
        status: Option<DeliveryStatus>,
    ) -> Message {
        let message = Message {
            id: new_id("m"),
            from_id: from_id.to_string(),
            to_id: to_id.to_string(),
            text: text.to_string(),
            timestamp: Utc::now(),
            is_read: false,
            status,
        };
        self.with_state_mut(|state| state.messages.insert(0, message.clone()));
        debug!("Message {} {} -> {}", message.id, from_id, to_id);
        message
    }

    /// Settle a `sending` message. Terminal states are never overwritten and
    /// `sending` is not a valid outcome. Returns whether the status changed.
    pub fn resolve_delivery(&self, message_id: &str, outcome: DeliveryStatus) -> bool {
        if !outcome.is_terminal() {
            return false;
        }
        self.with_state_mut(|state| {
            match state.messages.iter_mut().find(|m| m.id == message_id) {
                Some(msg) if msg.status == Some(DeliveryStatus::Sending) => {
                    msg.status = Some(outcome);
                    true
                }
                _ => false,
            }
        })
    }

    /// Mark everything `other_id` sent to `user_id` as read. Returns how many
    /// messages flipped.
    pub fn mark_messages_as_read(&self, user_id: &str, other_id: &str) -> usize {
        self.with_state_mut(|state| {
            let mut flipped = 0;
            for msg in state
                .messages
                .iter_mut()
                .filter(|m| m.from_id == other_id && m.to_id == user_id && !m.is_read)
            {
                msg.is_read = true;
                flipped += 1;
            }
            flipped
        })
    }
}

fn check_funds(user: &User, needed: Cents) -> StoreResult<()> {
    if user.balance < needed {
        return Err(StoreError::InsufficientBalance {
            needed,
            available: user.balance,
        });
    }
    Ok(())
}

fn apply_debit<'a>(
    state: &'a mut PlatformState,
    user_id: &str,
    amount: Cents,
) -> StoreResult<&'a mut User> {
    let user = state
        .user_mut(user_id)
        .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))?;
    user.balance = user
        .balance
        .checked_sub(amount)
        .ok_or(StoreError::InsufficientBalance {
            needed: amount,
            available: user.balance,
        })?;
    Ok(user)
}

fn debit_amount(amount: Cents) -> i64 {
    -i64::try_from(amount).unwrap_or(i64::MAX)
}
