//! UseCase: 表示名の取得
//!
//! 空の名前と既に使われている名前 (自分自身の現在の名前も含む) は
//! "Name taken" で拒否する。別の名前を取得した場合は古い名前を解放する。

use crate::domain::{ClaimError, ConnectionId, OutgoingEvent};

use super::hub::Hub;

impl Hub {
    pub(super) fn claim_name(&mut self, connection_id: ConnectionId, requested: &str) {
        let claimed = match self.state.claim_name(&connection_id, requested) {
            Ok(claimed) => claimed,
            Err(ClaimError::UnknownConnection(_)) => return,
            Err(e) => {
                tracing::info!("Rejected name claim from '{}': {}", connection_id, e);
                self.push_to(connection_id, OutgoingEvent::name_taken());
                return;
            }
        };

        match &claimed.released {
            Some(old) => tracing::info!(
                "Connection '{}' renamed '{}' -> '{}'",
                connection_id,
                old,
                claimed.name
            ),
            None => tracing::info!(
                "Connection '{}' claimed '{}'",
                connection_id,
                claimed.name
            ),
        }

        self.push_to(connection_id, OutgoingEvent::NameAccepted);
        self.broadcast(OutgoingEvent::UserList {
            users: self.state.user_list(),
        });
        if claimed.released_was_typing {
            self.broadcast(OutgoingEvent::Typing {
                users: self.state.typing_list(),
            });
        }
    }
}
