use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use tracing::info;

use creatorhub_types::api::{
    AccessCodeRequest, CreatePostRequest, CreatorStats, SubscribeRequest, UnfollowRequest,
};
use creatorhub_types::models::CreatorProfileUpdate;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn list_creators(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.store.creators())
}

pub async fn get_creator(
    State(state): State<AppState>,
    Path(creator_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state
        .store
        .get_creator_by_id(&creator_id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("creator"))
}

pub async fn update_creator(
    State(state): State<AppState>,
    Path(creator_id): Path<String>,
    Json(update): Json<CreatorProfileUpdate>,
) -> ApiResult<impl IntoResponse> {
    state
        .store
        .update_creator_profile(&creator_id, update)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("creator"))
}

pub async fn creator_posts(
    State(state): State<AppState>,
    Path(creator_id): Path<String>,
) -> impl IntoResponse {
    Json(state.store.get_posts_by_creator_id(&creator_id))
}

pub async fn creator_stats(
    State(state): State<AppState>,
    Path(creator_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    if state.store.get_creator_by_id(&creator_id).is_none() {
        return Err(ApiError::not_found("creator"));
    }
    Ok(Json(CreatorStats {
        followers: state.store.get_follower_count(&creator_id),
        total_tips: state.store.get_total_tips_by_creator_id(&creator_id),
        creator_id,
    }))
}

pub async fn create_post(
    State(state): State<AppState>,
    Path(creator_id): Path<String>,
    Json(req): Json<CreatePostRequest>,
) -> ApiResult<impl IntoResponse> {
    let post = state
        .store
        .add_post(&creator_id, &req.text, req.image_url, req.is_private)?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn subscribe(
    State(state): State<AppState>,
    Path(creator_id): Path<String>,
    Json(req): Json<SubscribeRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .store
        .subscribe_creator(&req.user_id, &creator_id, &req.access_code)?;
    Ok(Json(user))
}

pub async fn unfollow(
    State(state): State<AppState>,
    Path(creator_id): Path<String>,
    Json(req): Json<UnfollowRequest>,
) -> impl IntoResponse {
    let removed = state.store.unfollow_creator(&req.user_id, &creator_id);
    Json(json!({ "removed": removed }))
}

pub async fn set_access_code(
    State(state): State<AppState>,
    Path(creator_id): Path<String>,
    Json(req): Json<AccessCodeRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.access_code.trim().is_empty() {
        return Err(ApiError::bad_request("access code must not be empty"));
    }
    if !state
        .store
        .update_creator_access_code(&creator_id, req.access_code.trim())
    {
        return Err(ApiError::not_found("creator"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /creators/{id}/verification: admin toggle of the verified badge.
pub async fn toggle_verification(
    State(state): State<AppState>,
    Path(creator_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let verified = state
        .store
        .toggle_creator_verification(&creator_id)
        .ok_or_else(|| ApiError::not_found("creator"))?;
    info!("Creator {} verification set to {}", creator_id, verified);
    Ok(Json(json!({ "is_verified": verified })))
}
