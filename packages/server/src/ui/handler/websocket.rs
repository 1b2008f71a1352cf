//! WebSocket connection handlers.
//!
//! Each upgraded socket becomes one hub connection with two flows: the
//! inbound loop decodes frames and dispatches them to the hub, and the
//! pusher task drains the connection's mailbox onto the socket.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::task::JoinHandle;

use crate::{
    domain::ConnectionId,
    infrastructure::{
        dto::codec::{decode_incoming, encode_outgoing},
        message_pusher::{MailboxReceiver, mailbox},
    },
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the mailbox onto the WebSocket sender.
///
/// The task ends when the hub closes the mailbox (after unregister or
/// shutdown) or a write fails, and then closes the socket.
fn pusher_loop(
    connection_id: ConnectionId,
    mut rx: MailboxReceiver,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let kind = event.kind();
            let text = match encode_outgoing(event) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Dropping {} for '{}': {}", kind, connection_id, e);
                    continue;
                }
            };
            if let Err(e) = sender.send(Message::Text(text.into())).await {
                tracing::debug!("Failed to write to '{}': {}", connection_id, e);
                break;
            }
        }
        let _ = sender.close().await;
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let (tx, rx) = mailbox(state.mailbox_capacity);
    if let Err(e) = state.hub.register(connection_id, tx).await {
        tracing::warn!("Refusing connection '{}': {}", connection_id, e);
        return;
    }
    tracing::info!("Connection '{}' opened", connection_id);

    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(connection_id, rx, sender);
    let mut send_task_done = false;

    loop {
        tokio::select! {
            frame = receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => match decode_incoming(text.as_str()) {
                    Ok(event) => {
                        if state.hub.dispatch(connection_id, event).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Discarding frame from '{}': {}", connection_id, e);
                    }
                },
                Some(Ok(Message::Binary(_))) => {
                    tracing::warn!("Discarding binary frame from '{}'", connection_id);
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Connection '{}' closed by client", connection_id);
                    break;
                }
                // Ping/Pong are answered by axum
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::error!("Transport error on '{}': {}", connection_id, e);
                    break;
                }
            },
            _ = &mut send_task => {
                send_task_done = true;
                tracing::debug!("Outbound flow of '{}' ended", connection_id);
                break;
            }
        }
    }

    if let Err(e) = state.hub.unregister(connection_id).await {
        tracing::debug!("Unregister of '{}' skipped: {}", connection_id, e);
    }
    if !send_task_done {
        let _ = send_task.await;
    }
    tracing::info!("Connection '{}' finished", connection_id);
}
