//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{infrastructure::dto::websocket::ChatMessageDto, ui::state::AppState};

/// Liveness probe: 200 with an empty body
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Most recent persisted messages, oldest first
pub async fn history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ChatMessageDto>>, StatusCode> {
    match state.get_recent_messages_usecase.execute().await {
        Ok(messages) => {
            // Domain Model から DTO への変換
            let dtos = messages.iter().map(ChatMessageDto::from).collect();
            Ok(Json(dtos))
        }
        Err(e) => {
            tracing::error!("Failed to load history: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
