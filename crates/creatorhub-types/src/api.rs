use serde::{Deserialize, Serialize};

use crate::Cents;
use crate::models::{Message, User};

// -- Subscriptions --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubscribeRequest {
    pub user_id: String,
    pub access_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnfollowRequest {
    pub user_id: String,
}

// -- Posts --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePostRequest {
    pub text: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_private: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TipRequest {
    pub fan_id: String,
    pub amount: Cents,
}

#[derive(Debug, Serialize)]
pub struct TipResponse {
    pub user: User,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    pub from_id: String,
    pub to_id: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkReadRequest {
    pub user_id: String,
    pub other_id: String,
}

#[derive(Debug, Serialize)]
pub struct UnreadResponse {
    pub total: usize,
    pub by_counterpart: std::collections::HashMap<String, usize>,
}

#[derive(Debug, Serialize)]
pub struct ConversationSummary {
    pub counterpart_id: String,
    pub last_message: Message,
    pub unread: usize,
    pub typing: bool,
}

// -- Creators --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessCodeRequest {
    pub access_code: String,
}

#[derive(Debug, Serialize)]
pub struct CreatorStats {
    pub creator_id: String,
    pub followers: usize,
    pub total_tips: Cents,
}

// -- Assistant --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DraftRequest {
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuggestRepliesRequest {
    pub user_id: String,
    pub other_id: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestRepliesResponse {
    pub replies: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranscribeRequest {
    /// Base64-encoded audio clip.
    pub audio: String,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
}

fn default_mime_type() -> String {
    "audio/webm".to_string()
}

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
}
