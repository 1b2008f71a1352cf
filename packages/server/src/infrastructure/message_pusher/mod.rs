//! Delivery of hub events into per-connection mailboxes.
//!
//! - `mailbox`: bounded `tokio::sync::mpsc` mailboxes with non-blocking fan-out

pub mod mailbox;

pub use mailbox::{Mailbox, MailboxPusher, MailboxReceiver, mailbox};
