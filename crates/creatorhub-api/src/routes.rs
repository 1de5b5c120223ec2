use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};
use serde_json::json;

use crate::state::AppState;
use crate::{assist, creators, events, messages, posts, users};

pub fn router(state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/users", get(users::list_users))
        .route("/users/{user_id}", get(users::get_user).patch(users::update_user))
        .route("/users/{user_id}/creator-profile", get(users::get_creator_profile))
        .route("/users/{user_id}/feed", get(users::main_feed))
        .route("/users/{user_id}/discover", get(users::discover_feed))
        .route("/users/{user_id}/following", get(users::following_feed))
        .route("/users/{user_id}/transactions", get(users::transactions))
        .route("/users/{user_id}/wallet", get(users::wallet))
        .route("/users/{user_id}/conversations", get(users::conversations))
        .route("/users/{user_id}/unread", get(users::unread))
        .route("/users/{user_id}/events", get(events::events_upgrade));

    let creator_routes = Router::new()
        .route("/creators", get(creators::list_creators))
        .route(
            "/creators/{creator_id}",
            get(creators::get_creator).patch(creators::update_creator),
        )
        .route(
            "/creators/{creator_id}/posts",
            get(creators::creator_posts).post(creators::create_post),
        )
        .route("/creators/{creator_id}/stats", get(creators::creator_stats))
        .route("/creators/{creator_id}/subscribe", post(creators::subscribe))
        .route("/creators/{creator_id}/unfollow", post(creators::unfollow))
        .route("/creators/{creator_id}/access-code", put(creators::set_access_code))
        .route("/creators/{creator_id}/verification", post(creators::toggle_verification));

    let post_routes = Router::new()
        .route("/posts", get(posts::list_posts))
        .route("/posts/{post_id}", put(posts::update_post).delete(posts::delete_post))
        .route("/posts/{post_id}/tips", post(posts::tip_post));

    let message_routes = Router::new()
        .route("/messages", post(messages::send_message))
        .route("/messages/read", post(messages::mark_read))
        .route("/messages/{a}/{b}", get(messages::get_messages));

    let assist_routes = Router::new()
        .route("/assist/draft", post(assist::draft_post))
        .route("/assist/replies", post(assist::suggest_replies))
        .route(
            "/assist/transcribe",
            post(assist::transcribe).layer(DefaultBodyLimit::max(assist::MAX_TRANSCRIBE_BODY)),
        );

    Router::new()
        .merge(user_routes)
        .merge(creator_routes)
        .merge(post_routes)
        .merge(message_routes)
        .merge(assist_routes)
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as B64;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use creatorhub_assist::Assistant;
    use creatorhub_realtime::{DeliverySimulator, Dispatcher};
    use creatorhub_store::Store;
    use creatorhub_store::seed::{FAN_ID, FAN_STARTING_BALANCE};

    use super::*;
    use crate::state::AppStateInner;

    fn app() -> (Router, Arc<Store>) {
        let store = Arc::new(Store::seeded());
        let dispatcher = Dispatcher::new();
        let delivery = DeliverySimulator::new(
            store.clone(),
            dispatcher.clone(),
            Duration::from_millis(10),
            0.0,
            1,
        );
        let state = Arc::new(AppStateInner {
            store: store.clone(),
            dispatcher,
            delivery,
            assistant: Assistant::unconfigured(),
        });
        (router(state), store)
    }

    async fn call(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        // Extractor rejections answer in plain text.
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    #[tokio::test]
    async fn subscribe_with_wrong_code_is_forbidden() {
        let (app, store) = app();
        let (status, body) = call(
            app,
            Method::POST,
            "/creators/creator-3/subscribe",
            Some(json!({ "user_id": FAN_ID, "access_code": "nope" })),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body["error"].as_str().unwrap().contains("access code"));
        assert_eq!(store.get_user_by_id(FAN_ID).unwrap().balance, FAN_STARTING_BALANCE);
    }

    #[tokio::test]
    async fn subscribe_returns_debited_user() {
        let (app, _) = app();
        let (status, body) = call(
            app,
            Method::POST,
            "/creators/creator-3/subscribe",
            Some(json!({ "user_id": FAN_ID, "access_code": "namaste" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["balance"], FAN_STARTING_BALANCE - 1_000);
        assert_eq!(body["role"], "fan");
    }

    #[tokio::test]
    async fn tip_beyond_balance_is_payment_required() {
        let (app, _) = app();
        let (status, _) = call(
            app,
            Method::POST,
            "/posts/p1/tips",
            Some(json!({ "fan_id": FAN_ID, "amount": FAN_STARTING_BALANCE + 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    }

    #[tokio::test]
    async fn deleting_twice_still_succeeds() {
        let (app, store) = app();
        let (first, _) = call(app.clone(), Method::DELETE, "/posts/p1", None).await;
        let (second, _) = call(app, Method::DELETE, "/posts/p1", None).await;
        assert_eq!(first, StatusCode::NO_CONTENT);
        assert_eq!(second, StatusCode::NO_CONTENT);
        assert_eq!(store.posts().len(), 5);
    }

    #[tokio::test]
    async fn sent_message_shows_up_in_conversations() {
        let (app, _) = app();
        let (status, body) = call(
            app.clone(),
            Method::POST,
            "/messages",
            Some(json!({ "from_id": FAN_ID, "to_id": "creator-3", "text": "hi" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "sending");

        let (_, conversations) =
            call(app.clone(), Method::GET, &format!("/users/{}/conversations", FAN_ID), None).await;
        let first = &conversations[0];
        assert_eq!(first["counterpart_id"], "creator-3");
        assert_eq!(first["last_message"]["text"], "hi");

        let (_, unread) = call(app, Method::GET, "/users/creator-3/unread", None).await;
        assert_eq!(unread["total"], 1);
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let (app, _) = app();
        let (status, _) = call(
            app,
            Method::POST,
            "/messages",
            Some(json!({ "from_id": FAN_ID, "to_id": "creator-3", "text": "   " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_user_feed_is_not_found() {
        let (app, _) = app();
        let (status, _) = call(app, Method::GET, "/users/ghost/feed", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn draft_without_key_returns_configuration_hint() {
        let (app, _) = app();
        let (status, body) = call(
            app,
            Method::POST,
            "/assist/draft",
            Some(json!({ "topic": "travel" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["text"],
            creatorhub_assist::assistant::DRAFT_NOT_CONFIGURED
        );
    }

    #[tokio::test]
    async fn transcribe_accepts_clips_above_default_body_limit() {
        let (app, _) = app();
        // 3 MB of audio is about 4 MB of base64, twice axum's default limit.
        let audio = B64.encode(vec![7u8; 3 * 1024 * 1024]);
        let (status, body) = call(
            app,
            Method::POST,
            "/assist/transcribe",
            Some(json!({ "audio": audio, "mime_type": "audio/webm" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["text"],
            creatorhub_assist::assistant::TRANSCRIBE_FALLBACK
        );
    }

    #[tokio::test]
    async fn transcribe_rejects_oversized_clips() {
        let (app, _) = app();
        let audio = B64.encode(vec![7u8; assist::MAX_AUDIO_SIZE + 1024 * 1024]);
        let (status, _) = call(
            app,
            Method::POST,
            "/assist/transcribe",
            Some(json!({ "audio": audio })),
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
