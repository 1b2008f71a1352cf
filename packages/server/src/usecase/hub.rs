//! The connection hub.
//!
//! One task owns [`HubState`] and the mailbox registry. Connections talk to it
//! only through a [`HubHandle`], which feeds a single command channel, so every
//! operation is applied atomically and in the order it was submitted by each
//! connection. The hub never awaits while holding state: mailbox sends are
//! non-blocking and queue publishing runs on detached tasks.
//!
//! The operations themselves live in the sibling modules
//! (`register_connection`, `unregister_connection`, `claim_name`,
//! `submit_message`, `set_typing`).

use std::{ops::ControlFlow, sync::Arc};

use natter_shared::time::Clock;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};

use crate::{
    domain::{
        ChatMessagePublisher, ConnectionId, HubState, IncomingEvent, MessageIdFactory,
        MessagePushError, OutgoingEvent,
    },
    infrastructure::message_pusher::{Mailbox, MailboxPusher},
};

use super::error::HubError;

/// Requests accepted by the control loop.
#[derive(Debug)]
pub enum HubCommand {
    Register {
        connection_id: ConnectionId,
        mailbox: Mailbox,
    },
    Unregister {
        connection_id: ConnectionId,
    },
    Dispatch {
        connection_id: ConnectionId,
        event: IncomingEvent,
    },
    Shutdown {
        done: oneshot::Sender<()>,
    },
}

/// Cloneable sender side of the hub's command channel.
#[derive(Debug, Clone)]
pub struct HubHandle {
    commands: mpsc::Sender<HubCommand>,
}

impl HubHandle {
    pub async fn register(
        &self,
        connection_id: ConnectionId,
        mailbox: Mailbox,
    ) -> Result<(), HubError> {
        self.send(HubCommand::Register {
            connection_id,
            mailbox,
        })
        .await
    }

    pub async fn unregister(&self, connection_id: ConnectionId) -> Result<(), HubError> {
        self.send(HubCommand::Unregister { connection_id }).await
    }

    pub async fn dispatch(
        &self,
        connection_id: ConnectionId,
        event: IncomingEvent,
    ) -> Result<(), HubError> {
        self.send(HubCommand::Dispatch {
            connection_id,
            event,
        })
        .await
    }

    /// Close every mailbox and stop the control loop. Resolves once the hub
    /// has finished; calling it on a stopped hub is not an error.
    pub async fn shutdown(&self) -> Result<(), HubError> {
        let (done, finished) = oneshot::channel();
        if self.send(HubCommand::Shutdown { done }).await.is_err() {
            return Ok(());
        }
        finished.await.map_err(|_| HubError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    async fn send(&self, command: HubCommand) -> Result<(), HubError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| HubError::Closed)
    }
}

pub struct Hub {
    pub(super) state: HubState,
    pub(super) pusher: MailboxPusher,
    pub(super) publisher: Arc<dyn ChatMessagePublisher>,
    pub(super) clock: Arc<dyn Clock>,
    pub(super) message_ids: MessageIdFactory,
    /// Connections whose mailbox overflowed, waiting to be unregistered
    pending_evictions: Vec<ConnectionId>,
}

impl Hub {
    pub fn new(publisher: Arc<dyn ChatMessagePublisher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: HubState::new(),
            pusher: MailboxPusher::new(),
            publisher,
            clock,
            message_ids: MessageIdFactory::new(),
            pending_evictions: Vec::new(),
        }
    }

    /// Start the control loop on its own task.
    ///
    /// `buffer` bounds the command channel shared by all connections.
    pub fn spawn(self, buffer: usize) -> (HubHandle, JoinHandle<()>) {
        let (commands, receiver) = mpsc::channel(buffer);
        let task = tokio::spawn(self.run(receiver));
        (HubHandle { commands }, task)
    }

    async fn run(mut self, mut commands: mpsc::Receiver<HubCommand>) {
        tracing::info!("Hub control loop started");
        while let Some(command) = commands.recv().await {
            if self.apply(command).is_break() {
                break;
            }
        }
        self.close();
        tracing::info!("Hub control loop stopped");
    }

    /// Apply one command as a single atomic step.
    pub fn apply(&mut self, command: HubCommand) -> ControlFlow<()> {
        match command {
            HubCommand::Register {
                connection_id,
                mailbox,
            } => self.register(connection_id, mailbox),
            HubCommand::Unregister { connection_id } => self.unregister(connection_id),
            HubCommand::Dispatch {
                connection_id,
                event,
            } => self.dispatch(connection_id, event),
            HubCommand::Shutdown { done } => {
                self.close();
                let _ = done.send(());
                return ControlFlow::Break(());
            }
        }
        self.process_evictions();
        ControlFlow::Continue(())
    }

    fn dispatch(&mut self, connection_id: ConnectionId, event: IncomingEvent) {
        if !self.state.is_live(&connection_id) {
            tracing::debug!(
                "Ignoring event from connection '{}' that is no longer live",
                connection_id
            );
            return;
        }
        match event {
            IncomingEvent::SetName { name } => self.claim_name(connection_id, &name),
            IncomingEvent::Message { text } => self.submit_message(connection_id, text),
            IncomingEvent::TypingStart => self.set_typing(connection_id, true),
            IncomingEvent::TypingStop => self.set_typing(connection_id, false),
        }
    }

    /// Enqueue `event` into every live mailbox.
    pub(super) fn broadcast(&mut self, event: OutgoingEvent) {
        let dropped = self.pusher.broadcast(&event);
        tracing::debug!(
            "Broadcasted {} to {} connection(s)",
            event.kind(),
            self.pusher.len()
        );
        self.pending_evictions.extend(dropped);
    }

    /// Enqueue `event` into one connection's mailbox.
    pub(super) fn push_to(&mut self, connection_id: ConnectionId, event: OutgoingEvent) {
        match self.pusher.push_to(&connection_id, event) {
            Ok(()) => {}
            Err(MessagePushError::ClientNotFound(_)) => {
                tracing::debug!("Connection '{}' has no mailbox, skipping", connection_id);
            }
            Err(e) => {
                tracing::warn!("{}", e);
                self.pending_evictions.push(connection_id);
            }
        }
    }

    /// Unregister connections whose mailbox overflowed or closed. Each
    /// eviction broadcasts again and may overflow further mailboxes; the loop
    /// ends because every round removes a connection.
    fn process_evictions(&mut self) {
        while let Some(connection_id) = self.pending_evictions.pop() {
            if self.state.is_live(&connection_id) {
                tracing::warn!("Evicting slow connection '{}'", connection_id);
                self.unregister(connection_id);
            }
        }
    }

    fn close(&mut self) {
        let live = self.state.live_count();
        self.pusher.close_all();
        self.state.clear();
        self.pending_evictions.clear();
        tracing::info!("Hub closed {} mailbox(es)", live);
    }

    pub fn state(&self) -> &HubState {
        &self.state
    }
}
