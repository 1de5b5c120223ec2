use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use creatorhub_types::api::{TipRequest, TipResponse};
use creatorhub_types::models::PostEdit;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn list_posts(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.store.posts())
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Json(edit): Json<PostEdit>,
) -> ApiResult<impl IntoResponse> {
    state
        .store
        .update_post(&post_id, edit)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("post"))
}

/// DELETE /posts/{id}: deleting an already-deleted post still succeeds.
pub async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> impl IntoResponse {
    state.store.remove_post(&post_id);
    StatusCode::NO_CONTENT
}

pub async fn tip_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Json(req): Json<TipRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state.store.tip_post(&req.fan_id, &post_id, req.amount)?;
    Ok(Json(TipResponse { user }))
}
