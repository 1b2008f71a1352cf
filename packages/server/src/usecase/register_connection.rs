//! UseCase: 接続の登録
//!
//! 登録直後は名前を持たないため、ブロードキャストは行わない。

use crate::{domain::ConnectionId, infrastructure::message_pusher::Mailbox};

use super::hub::Hub;

impl Hub {
    /// Add a connection to the live set and attach its mailbox.
    pub(super) fn register(&mut self, connection_id: ConnectionId, mailbox: Mailbox) {
        if !self.state.register(connection_id) {
            tracing::warn!(
                "Connection '{}' is already registered, ignoring",
                connection_id
            );
            return;
        }
        self.pusher.register_client(connection_id, mailbox);
        tracing::info!(
            "Connection '{}' registered ({} live)",
            connection_id,
            self.state.live_count()
        );
    }
}
