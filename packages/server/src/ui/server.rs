//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::{GetRecentMessagesUseCase, HubHandle};

use super::{
    handler::{health_check, history, websocket_handler},
    state::AppState,
};

/// WebSocket chat gateway
///
/// # Example
///
/// ```ignore
/// let server = Server::new(hub, get_recent_messages_usecase, 32);
/// server.serve(listener, shutdown_signal()).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(
        hub: HubHandle,
        get_recent_messages_usecase: Arc<GetRecentMessagesUseCase>,
        mailbox_capacity: usize,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                hub,
                get_recent_messages_usecase,
                mailbox_capacity,
            }),
        }
    }

    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/healthz", get(health_check))
            .route("/history", get(history))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Serve on `listener` until `shutdown` resolves.
    ///
    /// Shutting down also stops the hub, which closes every mailbox so the
    /// open WebSocket connections terminate.
    pub async fn serve<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let hub = self.state.hub.clone();

        let local_addr = listener.local_addr()?;
        tracing::info!("Chat gateway listening on {}", local_addr);
        tracing::info!("Connect to: ws://{}/ws", local_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                if let Err(e) = hub.shutdown().await {
                    tracing::warn!("Hub shutdown failed: {}", e);
                }
            })
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}
