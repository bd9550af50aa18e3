use crate::server::AppState;
use crate::transport::Connection;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use tincan_core::ConnectionId;
use tracing::{info, warn};

/// Display name used when a client connects without one.
pub const DEFAULT_USERNAME: &str = "Anonymous";

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub username: Option<String>,
    pub token: Option<String>,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, query, state))
}

async fn handle_socket(socket: WebSocket, query: WsQuery, state: AppState) {
    let mut username = query
        .username
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_USERNAME.to_string());

    let mut user_id = None;
    if let Some(token) = query.token.as_deref() {
        match state.auth.authenticate(token).await {
            Some(user) => {
                user_id = Some(user.id);
                username = user.username;
            }
            None => warn!("Ignoring invalid token on signaling connect"),
        }
    }

    let (connection, mut outbound_rx) = Connection::new(ConnectionId::new(), username.clone());
    info!("New connection {:?} (username: {})", connection.id(), username);

    if let Some(id) = user_id {
        if let Err(e) = state.users.set_online_status(id, true).await {
            warn!("Failed to mark user {} online: {}", id, e);
        }
    }

    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(first) = outbound_rx.recv().await {
            // Whatever queued up behind the first frame goes out in the
            // same write, newline-separated.
            let mut frame = first;
            while let Ok(next) = outbound_rx.try_recv() {
                frame.push('\n');
                frame.push_str(&next);
            }

            if sender.send(Message::Text(frame.into())).await.is_err() {
                return;
            }
        }

        // Queue closed server-side; tell the client before the socket drops.
        let _ = sender.send(Message::Close(None)).await;
    });

    let mut recv_task = tokio::spawn({
        let service = state.signaling.clone();
        let connection = Arc::clone(&connection);

        async move {
            while let Some(Ok(message)) = receiver.next().await {
                match message {
                    Message::Text(text) => {
                        if let Err(e) = service.handle_message(&connection, text.as_str()) {
                            warn!("Error handling message from {:?}: {}", connection.id(), e);
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    state.signaling.disconnect(&connection);
    connection.close_outbound();

    if let Some(id) = user_id {
        if let Err(e) = state.users.set_online_status(id, false).await {
            warn!("Failed to mark user {} offline: {}", id, e);
        }
    }

    info!("Connection {:?} disconnected", connection.id());
}
