use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use creatorhub_types::api::{MarkReadRequest, SendMessageRequest};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// 4 KB message text limit
const MAX_MESSAGE_LEN: usize = 4096;

/// POST /messages: the message is stored as `sending` and its delivery
/// receipt arrives later over the event stream.
pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> ApiResult<impl IntoResponse> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(ApiError::bad_request("message text must not be empty"));
    }
    if text.len() > MAX_MESSAGE_LEN {
        return Err(ApiError::bad_request("message text is too long"));
    }

    let message = state.delivery.send(&req.from_id, &req.to_id, text);
    Ok((StatusCode::CREATED, Json(message)))
}

/// GET /messages/{a}/{b}: conversation history, oldest first.
pub async fn get_messages(
    State(state): State<AppState>,
    Path((a, b)): Path<(String, String)>,
) -> impl IntoResponse {
    Json(state.store.get_messages(&a, &b))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Json(req): Json<MarkReadRequest>,
) -> impl IntoResponse {
    let marked = state.store.mark_messages_as_read(&req.user_id, &req.other_id);
    Json(json!({ "marked": marked }))
}
