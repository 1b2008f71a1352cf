//! WebSocket client session management.

use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use natter_server::infrastructure::dto::websocket::{IncomingMessage, OutgoingMessage};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use crate::{
    domain::{InputAction, parse_input},
    error::ClientError,
};

use super::{formatter::MessageFormatter, ui::redisplay_prompt};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Run one connection: claim `name`, then relay events and input until the
/// user quits or the connection is lost.
///
/// `input_rx` carries lines from the readline thread and outlives the session
/// so a reconnect keeps the same prompt.
pub async fn run_client_session(
    url: &str,
    name: &str,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    tracing::info!("Connected to chat server!");

    let (mut write, mut read) = ws_stream.split();

    send(
        &mut write,
        &IncomingMessage::SetName {
            name: name.to_string(),
        },
    )
    .await?;
    wait_for_name(&mut read, name).await?;

    println!(
        "\nYou are '{}'. Type messages and press Enter to send. /typing announces typing, /quit exits.\n",
        name
    );
    redisplay_prompt(name);

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    display(text.as_str(), name);
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Server closed the connection");
                    return Err(ClientError::ConnectionError("Connection lost".to_string()));
                }
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return Err(ClientError::ConnectionError(e.to_string()));
                }
                Some(Ok(_)) => {}
            },
            line = input_rx.recv() => {
                // Readline thread ended (Ctrl+C / Ctrl+D)
                let Some(line) = line else {
                    let _ = write.close().await;
                    return Ok(());
                };
                match parse_input(&line) {
                    InputAction::Quit => {
                        let _ = write.close().await;
                        return Ok(());
                    }
                    InputAction::Typing => {
                        send(&mut write, &IncomingMessage::TypingStart).await?;
                    }
                    InputAction::Send(text) => {
                        send(&mut write, &IncomingMessage::Message { text }).await?;
                        send(&mut write, &IncomingMessage::TypingStop).await?;
                    }
                    InputAction::Ignore => {}
                }
            }
        }
    }
}

async fn send(
    write: &mut SplitSink<Socket, Message>,
    message: &IncomingMessage,
) -> Result<(), ClientError> {
    let json = serde_json::to_string(message)
        .map_err(|e| ClientError::ConnectionError(format!("Failed to serialize: {}", e)))?;
    write
        .send(Message::text(json))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))
}

/// Wait for the answer to SET_NAME, printing any broadcast that arrives first.
async fn wait_for_name(read: &mut SplitStream<Socket>, name: &str) -> Result<(), ClientError> {
    while let Some(frame) = read.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => return Err(ClientError::ConnectionError(e.to_string())),
        };
        match serde_json::from_str::<OutgoingMessage>(text.as_str()) {
            Ok(OutgoingMessage::NameAccepted) => return Ok(()),
            Ok(OutgoingMessage::NameRejected { reason }) => {
                return Err(ClientError::NameRejected {
                    name: name.to_string(),
                    reason,
                });
            }
            Ok(event) => {
                if let Some(formatted) = MessageFormatter::format_event(&event, name) {
                    print!("{}", formatted);
                }
            }
            Err(_) => print!("{}", MessageFormatter::format_raw_message(text.as_str())),
        }
    }
    Err(ClientError::ConnectionError(
        "Connection closed before the name was accepted".to_string(),
    ))
}

fn display(text: &str, name: &str) {
    let formatted = match serde_json::from_str::<OutgoingMessage>(text) {
        Ok(event) => MessageFormatter::format_event(&event, name),
        Err(_) => Some(MessageFormatter::format_raw_message(text)),
    };
    if let Some(formatted) = formatted {
        print!("{}", formatted);
        redisplay_prompt(name);
    }
}
