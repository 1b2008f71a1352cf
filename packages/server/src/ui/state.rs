//! Shared application state.

use std::sync::Arc;

use crate::usecase::{GetRecentMessagesUseCase, HubHandle};

/// Shared application state
pub struct AppState {
    /// 接続ハブへのハンドル
    pub hub: HubHandle,
    /// GetRecentMessagesUseCase（履歴取得のユースケース）
    pub get_recent_messages_usecase: Arc<GetRecentMessagesUseCase>,
    /// Capacity of each connection's outbound mailbox
    pub mailbox_capacity: usize,
}
