use serde::{Deserialize, Serialize};

use crate::models::{DeliveryStatus, Message};

/// Events pushed to realtime subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PlatformEvent {
    /// A message was appended to the store
    MessageCreate { message: Message },

    /// A tracked message left the `sending` state
    MessageStatus {
        message_id: String,
        status: DeliveryStatus,
    },

    /// `from_id` started typing to `to_id`
    TypingStart { from_id: String, to_id: String },

    /// `from_id` stopped typing to `to_id`
    TypingStop { from_id: String, to_id: String },
}

impl PlatformEvent {
    /// Returns the user this event is addressed to, if it is scoped.
    /// Events that return `None` are global.
    pub fn recipient(&self) -> Option<&str> {
        match self {
            Self::MessageCreate { message } => Some(&message.to_id),
            Self::TypingStart { to_id, .. } | Self::TypingStop { to_id, .. } => Some(to_id),
            Self::MessageStatus { .. } => None,
        }
    }
}

/// Commands sent FROM a client over the event stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientCommand {
    /// The connected user started typing to `to_id`
    StartTyping { to_id: String },

    /// The connected user stopped typing to `to_id`
    StopTyping { to_id: String },
}
