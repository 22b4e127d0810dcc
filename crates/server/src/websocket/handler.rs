//! WebSocket handler for Axum
//!
//! Handles WebSocket connections and event routing. Every inbound event is
//! interpreted against the room registry and fanned out to the room groups
//! or to a single addressed connection.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{stream::StreamExt, SinkExt};
use tokio::sync::mpsc;

use roomcast_core::{dates, ConnId, Message};

use crate::state::AppState;

use super::{
    connection::Connection,
    events::{ClientEvent, ServerEvent},
};

/// Nickname departure notices are signed with
pub const SYSTEM_NICKNAME: &str = "Room Admin";

/// WebSocket handler - upgrades HTTP connection to WebSocket
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    // Create channel for sending events to this connection
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    let conn = state.ws.add_connection(Connection::new(tx)).await;
    let conn_id = conn.id;

    // Tell the client its id; peers address it by this value
    let _ = conn.send(ServerEvent::Connected { id: conn_id });

    // Spawn task to send messages to client
    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if sender.send(WsMessage::Text(json)).await.is_err() {
                        break; // Connection closed
                    }
                }
                Err(e) => {
                    tracing::error!(error = ?e, "Failed to serialize WebSocket event");
                }
            }
        }
    });

    // Handle incoming messages
    while let Some(msg) = receiver.next().await {
        if let Ok(msg) = msg {
            match msg {
                WsMessage::Text(text) => {
                    match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => {
                            handle_client_event(event, Arc::clone(&conn), state.clone()).await;
                        }
                        Err(e) => {
                            tracing::warn!(
                                error = ?e,
                                message = %text,
                                "Failed to parse client event"
                            );
                            let _ = conn.send(ServerEvent::Error {
                                message: "Invalid event format".to_string(),
                            });
                        }
                    }
                }
                WsMessage::Close(_) => {
                    tracing::info!(conn_id = %conn_id, "WebSocket close frame received");
                    break;
                }
                WsMessage::Ping(_) | WsMessage::Pong(_) => {
                    // Axum handles ping/pong automatically
                }
                _ => {} // Ignore binary messages
            }
        }
    }

    // Cleanup on disconnect
    tracing::info!(conn_id = %conn_id, "WebSocket connection closing");
    handle_disconnect(conn_id, &state).await;

    send_task.abort();
}

/// Handle client event
async fn handle_client_event(event: ClientEvent, conn: Arc<Connection>, state: AppState) {
    use ClientEvent::*;

    match event {
        Join { room, nickname } => {
            // The room must exist before anyone joins it; a join referencing
            // an unknown room is dropped whole, group registration included.
            let outcome = match state.registry.join(&room, conn.id, &nickname).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(conn_id = %conn.id, error = %e, "Dropping join event");
                    return;
                }
            };
            let (users, peers) = (outcome.users, outcome.peers);

            state.ws.groups.join(&room, Arc::clone(&conn)).await;
            state
                .ws
                .groups
                .broadcast_except(&room, conn.id, ServerEvent::SetUsers { users })
                .await;

            // Deferred so the newcomer's client finishes local setup before
            // the others start signaling. The peer list is the one captured
            // at join time; a late fire into an emptied group is a no-op.
            let groups = Arc::clone(&state.ws.groups);
            let delay = Duration::from_millis(state.config.create_peers_delay_ms);
            let joiner = conn.id;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                groups
                    .broadcast_except(&room, joiner, ServerEvent::CreatePeers { peers })
                    .await;
            });
        }

        NewMessage {
            room,
            nickname,
            text,
            date,
        } => {
            let message = Message::new(nickname, text, date);
            if let Err(e) = state.registry.post_message(&room, message.clone()).await {
                tracing::warn!(conn_id = %conn.id, error = %e, "Dropping message event");
                return;
            }
            state
                .ws
                .groups
                .broadcast_except(&room, conn.id, ServerEvent::NewMessage { message })
                .await;
        }

        SendingSignal {
            user_to_signal,
            signal,
            caller_id,
        } => {
            state
                .ws
                .send_to(user_to_signal, ServerEvent::UserJoined { signal, caller_id })
                .await;
        }

        ReturningSignal { caller_id, signal } => {
            state
                .ws
                .send_to(
                    caller_id,
                    ServerEvent::ReceivingReturnedSignal {
                        signal,
                        id: conn.id,
                    },
                )
                .await;
        }
    }
}

/// Fan out a connection's departure to every room it was a member of
async fn handle_disconnect(conn_id: ConnId, state: &AppState) {
    // Leave the groups first so the departing connection cannot receive
    // its own notices.
    state.ws.remove_connection(conn_id).await;

    for departure in state.registry.remove_member_everywhere(conn_id).await {
        state
            .ws
            .groups
            .broadcast(
                &departure.room,
                ServerEvent::SetUsers {
                    users: departure.remaining,
                },
            )
            .await;
        state
            .ws
            .groups
            .broadcast(
                &departure.room,
                ServerEvent::NewMessage {
                    message: Message::new(
                        SYSTEM_NICKNAME,
                        format!("{}, left the room.", departure.nickname),
                        dates::today(),
                    ),
                },
            )
            .await;
    }
}
