//! Client execution logic with reconnection support.

use std::time::Duration;

use natter_server::infrastructure::dto::websocket::ChatMessageDto;
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use super::{
    domain::{should_attempt_reconnect, should_exit_immediately},
    error::ClientError,
    formatter::MessageFormatter,
    session::run_client_session,
    ui::prompt,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the chat client with reconnection logic
pub async fn run_client(
    url: String,
    history_url: String,
    name: String,
) -> Result<(), Box<dyn std::error::Error>> {
    match fetch_history(&history_url).await {
        Ok(messages) => print!("{}", MessageFormatter::format_history(&messages)),
        Err(e) => tracing::warn!("{}", e),
    }

    let mut input_rx = spawn_readline(name.clone());
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            url,
            name,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url, &name, &mut input_rx).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                break;
            }
            Err(e) => {
                if should_exit_immediately(&e) {
                    tracing::error!("{}", e);
                    return Err(Box::new(e));
                }

                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    return Err(Box::new(e));
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }

    Ok(())
}

async fn fetch_history(history_url: &str) -> Result<Vec<ChatMessageDto>, ClientError> {
    let response = reqwest::get(history_url)
        .await
        .map_err(|e| ClientError::HistoryError(e.to_string()))?
        .error_for_status()
        .map_err(|e| ClientError::HistoryError(e.to_string()))?;
    response
        .json::<Vec<ChatMessageDto>>()
        .await
        .map_err(|e| ClientError::HistoryError(e.to_string()))
}

/// Spawn a blocking thread for rustyline (synchronous readline).
///
/// The returned channel closes when the user presses Ctrl+C or Ctrl+D.
fn spawn_readline(name: String) -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = prompt(&name);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}
