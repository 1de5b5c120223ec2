use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use creatorhub_types::api::{ConversationSummary, UnreadResponse};
use creatorhub_types::models::{User, UserProfileUpdate};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn list_users(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.store.users())
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<User>> {
    load_user(&state, &user_id).map(Json)
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(update): Json<UserProfileUpdate>,
) -> ApiResult<Json<User>> {
    state
        .store
        .update_user_profile(&user_id, update)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("user"))
}

/// GET /users/{id}/creator-profile: public profile of a creator account.
pub async fn get_creator_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state
        .store
        .get_creator_by_user_id(&user_id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("creator profile"))
}

pub async fn main_feed(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user = load_user(&state, &user_id)?;
    Ok(Json(state.store.get_main_feed(&user)))
}

pub async fn discover_feed(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user = load_user(&state, &user_id)?;
    Ok(Json(state.store.get_discover_feed(&user)))
}

pub async fn following_feed(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user = load_user(&state, &user_id)?;
    Ok(Json(state.store.get_subscribed_posts(&user)))
}

pub async fn transactions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    Json(state.store.get_transactions_by_user_id(&user_id))
}

pub async fn wallet(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state
        .store
        .get_wallet_summary(&user_id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("user"))
}

/// GET /users/{id}/conversations: latest message per counterpart with
/// unread and typing state folded in.
pub async fn conversations(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    let unread = state.store.get_unread_message_counts(&user_id);
    let typing = state.dispatcher.typing_status(&user_id).await;

    let summaries: Vec<ConversationSummary> = state
        .store
        .get_conversations(&user_id)
        .into_iter()
        .filter_map(|last_message| {
            let counterpart_id = last_message.counterpart(&user_id)?.to_string();
            Some(ConversationSummary {
                unread: unread.get(&counterpart_id).copied().unwrap_or(0),
                typing: typing.get(&counterpart_id).copied().unwrap_or(false),
                counterpart_id,
                last_message,
            })
        })
        .collect();

    Json(summaries)
}

pub async fn unread(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    let by_counterpart = state.store.get_unread_message_counts(&user_id);
    Json(UnreadResponse {
        total: by_counterpart.values().sum(),
        by_counterpart,
    })
}

pub(crate) fn load_user(state: &AppState, user_id: &str) -> ApiResult<User> {
    state
        .store
        .get_user_by_id(user_id)
        .ok_or_else(|| ApiError::not_found("user"))
}
