//! UseCase 層
//!
//! - `hub`: 接続・名前・入力中状態を唯一所有する制御ループ
//! - 各操作 (`register_connection` など) は `Hub` の `impl` ブロックとして分割
//! - `persist_messages` / `get_recent_messages`: キューとストアを扱うメッセージサービス

pub mod claim_name;
pub mod error;
pub mod get_recent_messages;
pub mod hub;
pub mod persist_messages;
pub mod register_connection;
pub mod set_typing;
pub mod submit_message;
pub mod unregister_connection;

pub use error::HubError;
pub use get_recent_messages::GetRecentMessagesUseCase;
pub use hub::{Hub, HubCommand, HubHandle};
pub use persist_messages::StorageConsumer;
