//! Wires the gateway together and runs it.

use std::{future::Future, sync::Arc};

use natter_shared::time::SystemClock;
use tokio::{net::TcpListener, sync::watch};

use crate::{
    config::ServerConfig,
    infrastructure::{
        queue::{InMemoryQueue, QueueChatMessagePublisher},
        repository::InMemoryMessageStore,
    },
    ui::{Server, shutdown_signal},
    usecase::{GetRecentMessagesUseCase, Hub, StorageConsumer},
};

/// Bind to the configured address and serve until Ctrl+C / SIGTERM.
pub async fn run_server(
    config: ServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    config.validate()?;
    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("Press Ctrl+C to shutdown gracefully");
    serve(listener, config, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    config: ServerConfig,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    F: Future<Output = ()> + Send + 'static,
{
    config.validate()?;

    // Initialize dependencies in order:
    // 1. Queue and store
    // 2. Hub (publishes into the queue)
    // 3. Storage consumer (queue -> store)
    // 4. Server
    let queue = Arc::new(InMemoryQueue::new(config.visibility_timeout));
    let store = Arc::new(InMemoryMessageStore::new());

    let publisher = Arc::new(QueueChatMessagePublisher::new(queue.clone()));
    let (hub, hub_task) = Hub::new(publisher, Arc::new(SystemClock)).spawn(config.hub_buffer);

    let (consumer_shutdown, consumer_shutdown_rx) = watch::channel(false);
    let consumer_task =
        tokio::spawn(StorageConsumer::new(queue, store.clone()).run(consumer_shutdown_rx));

    let get_recent_messages_usecase = Arc::new(GetRecentMessagesUseCase::new(
        store,
        config.history_limit,
    ));
    let server = Server::new(
        hub.clone(),
        get_recent_messages_usecase,
        config.mailbox_capacity,
    );
    let result = server.serve(listener, shutdown).await;

    // The hub is normally already stopped by the server's graceful shutdown.
    if let Err(e) = hub.shutdown().await {
        tracing::warn!("Hub shutdown failed: {}", e);
    }
    let _ = consumer_shutdown.send(true);
    if let Err(e) = hub_task.await {
        tracing::error!("Hub task failed: {}", e);
    }
    if let Err(e) = consumer_task.await {
        tracing::error!("Storage consumer task failed: {}", e);
    }

    result
}
