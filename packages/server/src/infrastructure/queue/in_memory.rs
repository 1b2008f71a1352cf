//! In-memory message queue with visibility timeout.
//!
//! Received messages stay in flight under a fresh receipt handle until they
//! are deleted. If the consumer does not delete one before the visibility
//! timeout expires, it becomes receivable again.

use std::{
    collections::{HashMap, VecDeque},
    time::Duration,
};

use async_trait::async_trait;
use tokio::{
    sync::{Mutex, Notify},
    time::Instant,
};
use uuid::Uuid;

use crate::domain::{MessageQueue, QueueError, QueueMessage};

/// A message body tagged with its position in send order.
#[derive(Debug)]
struct Entry {
    sequence: u64,
    body: String,
}

#[derive(Debug)]
struct InFlight {
    entry: Entry,
    visible_at: Instant,
}

#[derive(Debug, Default)]
struct Inner {
    next_sequence: u64,
    visible: VecDeque<Entry>,
    in_flight: HashMap<String, InFlight>,
}

impl Inner {
    fn push(&mut self, body: String) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.visible.push_back(Entry { sequence, body });
    }

    /// Move expired in-flight messages back to the front of the queue, oldest
    /// first.
    fn requeue_expired(&mut self, now: Instant) {
        let expired: Vec<String> = self
            .in_flight
            .iter()
            .filter(|(_, message)| message.visible_at <= now)
            .map(|(receipt, _)| receipt.clone())
            .collect();
        let mut entries: Vec<Entry> = expired
            .into_iter()
            .filter_map(|receipt| {
                let message = self.in_flight.remove(&receipt)?;
                tracing::debug!("Queue message '{}' visibility expired, requeued", receipt);
                Some(message.entry)
            })
            .collect();
        entries.sort_by_key(|entry| std::cmp::Reverse(entry.sequence));
        for entry in entries {
            self.visible.push_front(entry);
        }
    }
}

pub struct InMemoryQueue {
    inner: Mutex<Inner>,
    notify: Notify,
    visibility_timeout: Duration,
}

impl InMemoryQueue {
    pub fn new(visibility_timeout: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            notify: Notify::new(),
            visibility_timeout,
        }
    }

    /// Messages waiting to be received (not counting in-flight ones).
    pub async fn visible_len(&self) -> usize {
        self.inner.lock().await.visible.len()
    }

    pub async fn in_flight_len(&self) -> usize {
        self.inner.lock().await.in_flight.len()
    }
}

#[async_trait]
impl MessageQueue for InMemoryQueue {
    async fn send(&self, body: String) -> Result<(), QueueError> {
        self.inner.lock().await.push(body);
        self.notify.notify_one();
        Ok(())
    }

    async fn receive(
        &self,
        max_messages: usize,
        wait: Duration,
    ) -> Result<Vec<QueueMessage>, QueueError> {
        let deadline = Instant::now() + wait;
        loop {
            {
                let now = Instant::now();
                let mut inner = self.inner.lock().await;
                inner.requeue_expired(now);

                let take = max_messages.min(inner.visible.len());
                if take > 0 {
                    let visible_at = now + self.visibility_timeout;
                    let entries: Vec<Entry> = inner.visible.drain(..take).collect();
                    let mut received = Vec::with_capacity(take);
                    for entry in entries {
                        let receipt_handle = Uuid::new_v4().to_string();
                        let body = entry.body.clone();
                        inner.in_flight.insert(
                            receipt_handle.clone(),
                            InFlight { entry, visible_at },
                        );
                        received.push(QueueMessage {
                            receipt_handle,
                            body,
                        });
                    }
                    return Ok(received);
                }
                if max_messages == 0 || now >= deadline {
                    return Ok(Vec::new());
                }
            }

            // A send stores a permit if nobody is waiting yet, so no wakeup is lost.
            let _ = tokio::time::timeout_at(deadline, self.notify.notified()).await;
        }
    }

    async fn delete(&self, receipt_handle: &str) -> Result<(), QueueError> {
        self.inner
            .lock()
            .await
            .in_flight
            .remove(receipt_handle)
            .map(|_| ())
            .ok_or_else(|| QueueError::ReceiptNotFound(receipt_handle.to_string()))
    }
}
