use axum::{
    extract::{
        Path, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use creatorhub_realtime::Dispatcher;
use creatorhub_types::events::{ClientCommand, PlatformEvent};

use crate::state::AppState;

/// GET /users/{id}/events: WebSocket stream of events addressed to the user.
pub async fn events_upgrade(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let dispatcher = state.dispatcher.clone();
    ws.on_upgrade(move |socket| handle_connection(socket, dispatcher, user_id))
}

async fn handle_connection(socket: WebSocket, dispatcher: Dispatcher, user_id: String) {
    let (mut sender, mut receiver) = socket.split();
    let mut broadcast_rx = dispatcher.subscribe();

    info!("{} connected to event stream", user_id);

    // Forward events for this user -> client
    let send_user = user_id.clone();
    let mut send_task = tokio::spawn(async move {
        loop {
            let event = match broadcast_rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(n)) => {
                    warn!("Event receiver for {} lagged by {} events", send_user, n);
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            if !is_visible_to(&event, &send_user) {
                continue;
            }
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Failed to encode event: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Read typing commands from client
    let recv_user = user_id.clone();
    let recv_dispatcher = dispatcher.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientCommand>(&text) {
                    Ok(ClientCommand::StartTyping { to_id }) => {
                        recv_dispatcher.start_typing(&recv_user, &to_id).await;
                    }
                    Ok(ClientCommand::StopTyping { to_id }) => {
                        recv_dispatcher.stop_typing(&recv_user, &to_id).await;
                    }
                    Err(e) => warn!("{} sent a bad command: {}", recv_user, e),
                },
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    // Typing flags die with the connection
    dispatcher.clear_typing_from(&user_id).await;

    info!("{} disconnected from event stream", user_id);
}

/// Scoped events go only to their recipient; a sender also sees its own
/// new messages.
fn is_visible_to(event: &PlatformEvent, user_id: &str) -> bool {
    match event {
        PlatformEvent::MessageCreate { message } => {
            message.to_id == user_id || message.from_id == user_id
        }
        other => other.recipient().is_none_or(|to| to == user_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_is_only_visible_to_its_target() {
        let event = PlatformEvent::TypingStart {
            from_id: "a".into(),
            to_id: "b".into(),
        };
        assert!(is_visible_to(&event, "b"));
        assert!(!is_visible_to(&event, "a"));
        assert!(!is_visible_to(&event, "c"));
    }

    #[test]
    fn status_updates_are_global() {
        let event = PlatformEvent::MessageStatus {
            message_id: "m".into(),
            status: creatorhub_types::models::DeliveryStatus::Sent,
        };
        assert!(is_visible_to(&event, "anyone"));
    }
}
