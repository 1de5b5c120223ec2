use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Cents;

/// Role-specific part of an account.
///
/// A creator account links to its public `Creator` profile by id rather than
/// by display name, so two creators sharing a name never collide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Role {
    Fan,
    Creator { profile_id: String },
    Admin,
}

impl Role {
    pub fn is_fan(&self) -> bool {
        matches!(self, Self::Fan)
    }

    pub fn creator_profile_id(&self) -> Option<&str> {
        match self {
            Self::Creator { profile_id } => Some(profile_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub avatar_url: String,
    #[serde(flatten)]
    pub role: Role,
    /// Creator ids this user follows.
    pub subscribed_to: Vec<String>,
    pub balance: Cents,
    pub bio: Option<String>,
}

impl User {
    pub fn is_subscribed_to(&self, creator_id: &str) -> bool {
        self.subscribed_to.iter().any(|id| id == creator_id)
    }
}

/// Public profile of a creator account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub id: String,
    pub name: String,
    pub handle: String,
    pub bio: String,
    pub avatar_url: String,
    pub banner_url: String,
    pub is_verified: bool,
    pub subscription_price: Cents,
    /// Compared case-insensitively.
    pub access_code: String,
}

impl Creator {
    pub fn access_code_matches(&self, code: &str) -> bool {
        self.access_code.to_uppercase() == code.to_uppercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub creator_id: String,
    pub text: String,
    pub image_url: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub likes: u64,
    pub comments: u64,
    /// Cumulative tips received.
    pub tips: Cents,
    pub is_private: bool,
}

/// Simulated delivery state. `Sent` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sending,
    Sent,
    Failed,
}

impl DeliveryStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Sending)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub from_id: String,
    pub to_id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
    /// `None` when delivery is not simulated for this message.
    pub status: Option<DeliveryStatus>,
}

impl Message {
    /// Whether this message belongs to the conversation between `a` and `b`.
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.from_id == a && self.to_id == b) || (self.from_id == b && self.to_id == a)
    }

    /// The other participant, seen from `user_id`.
    pub fn counterpart(&self, user_id: &str) -> Option<&str> {
        if self.from_id == user_id {
            Some(&self.to_id)
        } else if self.to_id == user_id {
            Some(&self.from_id)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Deposit,
    Subscription,
    Tip,
}

/// Ledger entry. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Signed; negative is a debit.
    pub amount: i64,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub related_creator_id: Option<String>,
    pub related_post_id: Option<String>,
}

/// Shallow patch for `Creator` profiles. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreatorProfileUpdate {
    pub name: Option<String>,
    pub handle: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub banner_url: Option<String>,
    pub subscription_price: Option<Cents>,
}

/// Shallow patch for `User` profiles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserProfileUpdate {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

/// The three fields a creator may edit on an existing post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostEdit {
    pub text: String,
    pub image_url: Option<String>,
    pub is_private: bool,
}

/// Aggregates shown on the fan wallet page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSummary {
    pub balance: Cents,
    pub total_spent: Cents,
    pub subscriptions: usize,
    pub tips_given: usize,
}
