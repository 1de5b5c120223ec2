use creatorhub_types::Cents;
use thiserror::Error;

/// Reasons a validated mutation was rejected. An `Err` always means no
/// state was changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("creator not found: {0}")]
    CreatorNotFound(String),

    #[error("post not found: {0}")]
    PostNotFound(String),

    #[error("already subscribed to {0}")]
    AlreadySubscribed(String),

    #[error("access code does not match")]
    InvalidAccessCode,

    #[error("insufficient balance: needed {needed}, available {available}")]
    InsufficientBalance { needed: Cents, available: Cents },

    #[error("amount must be greater than zero")]
    InvalidAmount,

    #[error("handle already taken: {0}")]
    HandleTaken(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
