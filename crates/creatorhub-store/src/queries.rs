use std::collections::HashMap;

use creatorhub_types::Cents;
use creatorhub_types::models::{
    Creator, Message, Post, Transaction, TransactionType, User, WalletSummary,
};

use crate::{PlatformState, Store};

impl Store {
    // -- Snapshots --

    pub fn users(&self) -> Vec<User> {
        self.with_state(|state| state.users.clone())
    }

    pub fn creators(&self) -> Vec<Creator> {
        self.with_state(|state| state.creators.clone())
    }

    pub fn posts(&self) -> Vec<Post> {
        self.with_state(|state| state.posts.clone())
    }

    pub fn messages(&self) -> Vec<Message> {
        self.with_state(|state| state.messages.clone())
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.with_state(|state| state.transactions.clone())
    }

    // -- Lookups --

    pub fn get_user_by_id(&self, user_id: &str) -> Option<User> {
        self.with_state(|state| state.user(user_id).cloned())
    }

    pub fn get_creator_by_id(&self, creator_id: &str) -> Option<Creator> {
        self.with_state(|state| state.creator(creator_id).cloned())
    }

    /// Resolve the public profile of a creator-role user through the
    /// profile link on the account. Fans and admins have no profile.
    pub fn get_creator_by_user_id(&self, user_id: &str) -> Option<Creator> {
        self.with_state(|state| {
            let profile_id = state.user(user_id)?.role.creator_profile_id()?;
            state.creator(profile_id).cloned()
        })
    }

    /// All posts of one creator, newest first.
    pub fn get_posts_by_creator_id(&self, creator_id: &str) -> Vec<Post> {
        self.with_state(|state| {
            newest_first(
                state
                    .posts
                    .iter()
                    .filter(|p| p.creator_id == creator_id)
                    .cloned()
                    .collect(),
            )
        })
    }

    // -- Feeds --

    /// Public posts from everyone plus private posts from followed creators.
    pub fn get_main_feed(&self, user: &User) -> Vec<Post> {
        self.feed(|post| !post.is_private || user.is_subscribed_to(&post.creator_id))
    }

    /// Public posts from creators the user does not follow.
    pub fn get_discover_feed(&self, user: &User) -> Vec<Post> {
        self.feed(|post| !post.is_private && !user.is_subscribed_to(&post.creator_id))
    }

    /// Every post from followed creators, public or not.
    pub fn get_subscribed_posts(&self, user: &User) -> Vec<Post> {
        self.feed(|post| user.is_subscribed_to(&post.creator_id))
    }

    fn feed<F>(&self, include: F) -> Vec<Post>
    where
        F: Fn(&Post) -> bool,
    {
        self.with_state(|state| {
            newest_first(
                state
                    .posts
                    .iter()
                    // Posts whose creator is gone are not rendered
                    .filter(|p| state.creator(&p.creator_id).is_some())
                    .filter(|p| include(p))
                    .cloned()
                    .collect(),
            )
        })
    }

    // -- Creator stats --

    pub fn get_follower_count(&self, creator_id: &str) -> usize {
        self.with_state(|state| {
            state
                .users
                .iter()
                .filter(|u| u.is_subscribed_to(creator_id))
                .count()
        })
    }

    pub fn get_total_tips_by_creator_id(&self, creator_id: &str) -> Cents {
        self.with_state(|state| {
            state
                .posts
                .iter()
                .filter(|p| p.creator_id == creator_id)
                .map(|p| p.tips)
                .sum()
        })
    }

    // -- Messaging --

    /// The latest message with every counterpart, most recent conversation
    /// first. On an exact timestamp tie the first message in storage, which is
    /// the later send, is kept.
    pub fn get_conversations(&self, user_id: &str) -> Vec<Message> {
        self.with_state(|state| {
            let mut latest: Vec<(&str, &Message)> = Vec::new();
            for msg in &state.messages {
                let Some(other) = msg.counterpart(user_id) else {
                    continue;
                };
                match latest.iter_mut().find(|(id, _)| *id == other) {
                    Some(entry) => {
                        if msg.timestamp > entry.1.timestamp {
                            entry.1 = msg;
                        }
                    }
                    None => latest.push((other, msg)),
                }
            }

            let mut conversations: Vec<Message> =
                latest.into_iter().map(|(_, msg)| msg.clone()).collect();
            conversations.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            conversations
        })
    }

    /// Full history between two participants, oldest first.
    pub fn get_messages(&self, a: &str, b: &str) -> Vec<Message> {
        self.with_state(|state| {
            let mut history: Vec<Message> = state
                .messages
                .iter()
                .filter(|m| m.is_between(a, b))
                .cloned()
                .collect();
            history.sort_by(|x, y| x.timestamp.cmp(&y.timestamp));
            history
        })
    }

    /// Unread messages addressed to `user_id`, keyed by sender.
    pub fn get_unread_message_counts(&self, user_id: &str) -> HashMap<String, usize> {
        self.with_state(|state| {
            let mut counts: HashMap<String, usize> = HashMap::new();
            for msg in state.messages.iter().filter(|m| m.to_id == user_id && !m.is_read) {
                *counts.entry(msg.from_id.clone()).or_default() += 1;
            }
            counts
        })
    }

    pub fn get_total_unread_count(&self, user_id: &str) -> usize {
        self.get_unread_message_counts(user_id).values().sum()
    }

    // -- Wallet --

    /// The user's ledger entries, newest first.
    pub fn get_transactions_by_user_id(&self, user_id: &str) -> Vec<Transaction> {
        self.with_state(|state| {
            let mut entries: Vec<Transaction> = state
                .transactions
                .iter()
                .filter(|t| t.user_id == user_id)
                .cloned()
                .collect();
            entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            entries
        })
    }

    pub fn get_wallet_summary(&self, user_id: &str) -> Option<WalletSummary> {
        self.with_state(|state| {
            let user = state.user(user_id)?;
            let mut summary = WalletSummary {
                balance: user.balance,
                ..WalletSummary::default()
            };
            for t in state.transactions.iter().filter(|t| t.user_id == user_id) {
                if t.amount < 0 {
                    summary.total_spent += t.amount.unsigned_abs();
                }
                match t.kind {
                    TransactionType::Subscription => summary.subscriptions += 1,
                    TransactionType::Tip => summary.tips_given += 1,
                    TransactionType::Deposit => {}
                }
            }
            Some(summary)
        })
    }
}

impl PlatformState {
    pub(crate) fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub(crate) fn user_mut(&mut self, id: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    pub(crate) fn creator(&self, id: &str) -> Option<&Creator> {
        self.creators.iter().find(|c| c.id == id)
    }

    pub(crate) fn creator_mut(&mut self, id: &str) -> Option<&mut Creator> {
        self.creators.iter_mut().find(|c| c.id == id)
    }

    pub(crate) fn post_mut(&mut self, id: &str) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id == id)
    }
}

/// Stable sort, so equal timestamps keep storage order (latest insert first).
fn newest_first(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    posts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{ADMIN_ID, CREATOR_USER_ID, FAN_ID};
    use creatorhub_types::models::Role;

    fn fan(store: &Store) -> User {
        store.get_user_by_id(FAN_ID).unwrap()
    }

    fn ids(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn posts_by_creator_are_newest_first() {
        let store = Store::seeded();
        let posts = store.get_posts_by_creator_id("creator-2");
        assert_eq!(ids(&posts), ["p1", "p4"]);
        assert!(store.get_posts_by_creator_id("creator-missing").is_empty());
    }

    #[test]
    fn creator_profile_resolves_through_role_link() {
        let store = Store::seeded();
        let profile = store.get_creator_by_user_id(CREATOR_USER_ID).unwrap();
        assert_eq!(profile.id, "creator-4");
        assert!(store.get_creator_by_user_id(FAN_ID).is_none());
        assert!(store.get_creator_by_user_id(ADMIN_ID).is_none());
    }

    #[test]
    fn creator_profile_lookup_ignores_display_name() {
        let mut state = crate::seed::fixtures();
        // Two profiles share the account's display name; only the linked one counts.
        let mut twin = state.creators[3].clone();
        twin.id = "creator-twin".into();
        twin.handle = "alexcodes2".into();
        state.creators.insert(0, twin);
        let store = Store::new(state);

        let profile = store.get_creator_by_user_id(CREATOR_USER_ID).unwrap();
        assert_eq!(profile.id, "creator-4");
    }

    #[test]
    fn main_feed_shows_public_and_followed_private_posts() {
        let store = Store::seeded();
        let feed = store.get_main_feed(&fan(&store));
        // p6 is private from an unfollowed creator
        assert_eq!(ids(&feed), ["p1", "p2", "p3", "p4", "p5"]);
    }

    #[test]
    fn main_feed_covers_public_and_subscribed_posts() {
        let store = Store::seeded();
        let user = fan(&store);
        let feed = store.get_main_feed(&user);
        for post in store.posts() {
            if !post.is_private || user.is_subscribed_to(&post.creator_id) {
                assert!(feed.iter().any(|p| p.id == post.id), "missing {}", post.id);
            }
        }
    }

    #[test]
    fn discover_feed_excludes_followed_and_private_posts() {
        let store = Store::seeded();
        let user = fan(&store);
        let discover = store.get_discover_feed(&user);
        assert_eq!(ids(&discover), ["p3", "p5"]);

        let main = store.get_main_feed(&user);
        for post in main.iter().filter(|p| p.is_private) {
            assert!(discover.iter().all(|d| d.id != post.id));
        }
    }

    #[test]
    fn subscribed_posts_only_include_followed_creators() {
        let store = Store::seeded();
        let posts = store.get_subscribed_posts(&fan(&store));
        assert_eq!(ids(&posts), ["p1", "p2", "p4"]);
    }

    #[test]
    fn feeds_skip_posts_of_missing_creators() {
        let mut state = crate::seed::fixtures();
        state.creators.retain(|c| c.id != "creator-3");
        let store = Store::new(state);
        let feed = store.get_main_feed(&fan(&store));
        assert!(feed.iter().all(|p| p.creator_id != "creator-3"));
    }

    #[test]
    fn follower_count_and_tip_totals() {
        let store = Store::seeded();
        assert_eq!(store.get_follower_count("creator-2"), 1);
        assert_eq!(store.get_follower_count("creator-3"), 0);
        assert_eq!(store.get_total_tips_by_creator_id("creator-2"), 14_000);
        assert_eq!(store.get_total_tips_by_creator_id("creator-missing"), 0);
    }

    #[test]
    fn conversations_keep_latest_message_per_counterpart() {
        let store = Store::seeded();
        let conversations = store.get_conversations(FAN_ID);
        let latest: Vec<&str> = conversations.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(latest, ["m2", "m3"]);
    }

    #[test]
    fn conversation_tie_prefers_later_sent_message() {
        let mut state = crate::seed::fixtures();
        let m2 = state.messages.iter().find(|m| m.id == "m2").unwrap().clone();
        let store = Store::new(state.clone());

        // Same timestamp as m2, stored the way a fresh send is stored.
        let mut later = m2;
        later.id = "m2-later".into();
        state.messages.insert(0, later);
        let store_with_tie = Store::new(state);

        assert_eq!(store.get_conversations(FAN_ID)[0].id, "m2");
        assert_eq!(store_with_tie.get_conversations(FAN_ID)[0].id, "m2-later");
    }

    #[test]
    fn post_tie_prefers_later_published_post() {
        let mut state = crate::seed::fixtures();
        let mut later = state.posts.iter().find(|p| p.id == "p1").unwrap().clone();
        later.id = "p1-later".into();
        state.posts.insert(0, later);
        let store = Store::new(state);

        assert_eq!(ids(&store.get_posts_by_creator_id("creator-2")), ["p1-later", "p1", "p4"]);
    }

    #[test]
    fn message_history_is_chronological() {
        let store = Store::seeded();
        let history = store.get_messages("creator-2", FAN_ID);
        let order: Vec<&str> = history.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(order, ["m1", "m2"]);
    }

    #[test]
    fn total_unread_matches_per_counterpart_sum() {
        let store = Store::seeded();
        for user in store.users() {
            let counts = store.get_unread_message_counts(&user.id);
            assert_eq!(store.get_total_unread_count(&user.id), counts.values().sum::<usize>());
        }
        assert_eq!(store.get_unread_message_counts(FAN_ID).get("creator-2"), Some(&1));
    }

    #[test]
    fn wallet_summary_counts_ledger_entries() {
        let store = Store::seeded();
        let summary = store.get_wallet_summary(FAN_ID).unwrap();
        assert_eq!(summary.balance, crate::seed::FAN_STARTING_BALANCE);
        assert_eq!(summary.total_spent, 0);
        assert_eq!(summary.subscriptions, 0);
        assert!(store.get_wallet_summary("nobody").is_none());
    }

    #[test]
    fn seed_accounts_use_tagged_roles() {
        let store = Store::seeded();
        let roles: Vec<Role> = store.users().into_iter().map(|u| u.role).collect();
        assert!(roles[0].is_fan());
        assert_eq!(roles[1].creator_profile_id(), Some("creator-4"));
        assert_eq!(roles[2], Role::Admin);
    }
}
