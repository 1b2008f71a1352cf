//! UseCase: 接続の登録解除
//!
//! 名前と入力中フラグを解放し、残りの接続へ USER_LIST と TYPING を送ってから
//! メールボックスを閉じる。

use crate::domain::{ConnectionId, OutgoingEvent};

use super::hub::Hub;

impl Hub {
    /// Remove a connection. Unknown connections are a no-op.
    pub(super) fn unregister(&mut self, connection_id: ConnectionId) {
        let Some(identity) = self.state.unregister(&connection_id) else {
            tracing::debug!("Connection '{}' is not registered, skipping", connection_id);
            return;
        };
        // Detached before broadcasting so the leaving connection gets nothing further.
        let mailbox = self.pusher.unregister_client(&connection_id);

        match &identity {
            Some(name) => tracing::info!(
                "Connection '{}' ({}) unregistered ({} live)",
                connection_id,
                name,
                self.state.live_count()
            ),
            None => tracing::info!(
                "Connection '{}' unregistered ({} live)",
                connection_id,
                self.state.live_count()
            ),
        }

        self.broadcast(OutgoingEvent::UserList {
            users: self.state.user_list(),
        });
        self.broadcast(OutgoingEvent::Typing {
            users: self.state.typing_list(),
        });

        // Closes the mailbox; the outbound pump ends once it has drained it.
        drop(mailbox);
    }
}
