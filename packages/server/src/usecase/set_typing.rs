//! UseCase: 入力中状態の更新

use crate::domain::{ConnectionId, OutgoingEvent};

use super::hub::Hub;

impl Hub {
    pub(super) fn set_typing(&mut self, connection_id: ConnectionId, is_typing: bool) {
        let Some(name) = self.state.set_typing(&connection_id, is_typing) else {
            tracing::debug!(
                "Ignoring typing update from unnamed connection '{}'",
                connection_id
            );
            return;
        };
        tracing::debug!("'{}' typing: {}", name, is_typing);

        self.broadcast(OutgoingEvent::Typing {
            users: self.state.typing_list(),
        });
    }
}
