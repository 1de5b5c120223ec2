use axum::{Json, extract::State, response::IntoResponse};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;

use creatorhub_types::api::{
    DraftRequest, DraftResponse, SuggestRepliesRequest, SuggestRepliesResponse, TranscribeRequest,
    TranscribeResponse,
};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// 10 MB audio limit after decoding
pub const MAX_AUDIO_SIZE: usize = 10 * 1024 * 1024;

/// Request body limit for transcription: the base64 form of a maximal clip
/// plus room for the surrounding JSON.
pub const MAX_TRANSCRIBE_BODY: usize = MAX_AUDIO_SIZE.div_ceil(3) * 4 + 4096;

pub async fn draft_post(
    State(state): State<AppState>,
    Json(req): Json<DraftRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.topic.trim().is_empty() {
        return Err(ApiError::bad_request("topic must not be empty"));
    }
    let text = state.assistant.draft_post(req.topic.trim()).await;
    Ok(Json(DraftResponse { text }))
}

pub async fn suggest_replies(
    State(state): State<AppState>,
    Json(req): Json<SuggestRepliesRequest>,
) -> impl IntoResponse {
    let history = state.store.get_messages(&req.user_id, &req.other_id);
    let replies = state.assistant.suggest_replies(&history, &req.user_id).await;
    Json(SuggestRepliesResponse { replies })
}

pub async fn transcribe(
    State(state): State<AppState>,
    Json(req): Json<TranscribeRequest>,
) -> ApiResult<impl IntoResponse> {
    let audio = B64
        .decode(&req.audio)
        .map_err(|_| ApiError::bad_request("audio must be base64"))?;
    if audio.len() > MAX_AUDIO_SIZE {
        return Err(ApiError::bad_request("audio clip is too large"));
    }
    let text = state.assistant.transcribe(&audio, &req.mime_type).await;
    Ok(Json(TranscribeResponse { text }))
}
