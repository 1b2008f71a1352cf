//! Mailbox-backed message pusher.
//!
//! Each connection owns the receiving half of a bounded channel; the hub
//! holds the sending half here. Sends never wait: a full or closed mailbox
//! makes the push fail immediately and the mailbox is removed (and thereby
//! closed), so one slow client can never stall the hub.

use std::collections::HashMap;

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::domain::{ConnectionId, MessagePushError, OutgoingEvent};

/// Sending half of a connection's mailbox
pub type Mailbox = mpsc::Sender<OutgoingEvent>;

/// Receiving half of a connection's mailbox, drained by its outbound pump
pub type MailboxReceiver = mpsc::Receiver<OutgoingEvent>;

/// Create a mailbox with the given capacity (must be non-zero).
pub fn mailbox(capacity: usize) -> (Mailbox, MailboxReceiver) {
    mpsc::channel(capacity)
}

#[derive(Debug, Default)]
pub struct MailboxPusher {
    /// Key: connection id, Value: sending half of its mailbox
    mailboxes: HashMap<ConnectionId, Mailbox>,
}

impl MailboxPusher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_client(&mut self, connection_id: ConnectionId, mailbox: Mailbox) {
        self.mailboxes.insert(connection_id, mailbox);
        tracing::debug!("Connection '{}' registered to MailboxPusher", connection_id);
    }

    /// Detach a mailbox. Dropping the returned sender closes it.
    pub fn unregister_client(&mut self, connection_id: &ConnectionId) -> Option<Mailbox> {
        let mailbox = self.mailboxes.remove(connection_id);
        if mailbox.is_some() {
            tracing::debug!("Connection '{}' unregistered from MailboxPusher", connection_id);
        }
        mailbox
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.mailboxes.contains_key(connection_id)
    }

    pub fn len(&self) -> usize {
        self.mailboxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mailboxes.is_empty()
    }

    /// Push one event to one connection.
    ///
    /// On `MailboxFull`/`MailboxClosed` the mailbox has already been removed.
    pub fn push_to(
        &mut self,
        connection_id: &ConnectionId,
        event: OutgoingEvent,
    ) -> Result<(), MessagePushError> {
        let mailbox = self
            .mailboxes
            .get(connection_id)
            .ok_or(MessagePushError::ClientNotFound(*connection_id))?;

        match mailbox.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.mailboxes.remove(connection_id);
                Err(MessagePushError::MailboxFull(*connection_id))
            }
            Err(TrySendError::Closed(_)) => {
                self.mailboxes.remove(connection_id);
                Err(MessagePushError::MailboxClosed(*connection_id))
            }
        }
    }

    /// Push the same event to every registered mailbox.
    ///
    /// Returns the connections whose mailbox was full or closed; those
    /// mailboxes are removed and receive nothing further.
    pub fn broadcast(&mut self, event: &OutgoingEvent) -> Vec<ConnectionId> {
        let mut dropped = Vec::new();
        self.mailboxes.retain(|connection_id, mailbox| {
            match mailbox.try_send(event.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(
                        "Mailbox of connection '{}' is full, dropping {}",
                        connection_id,
                        event.kind()
                    );
                    dropped.push(*connection_id);
                    false
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!("Mailbox of connection '{}' already closed", connection_id);
                    dropped.push(*connection_id);
                    false
                }
            }
        });
        dropped
    }

    /// Close every mailbox.
    pub fn close_all(&mut self) {
        self.mailboxes.clear();
    }
}
