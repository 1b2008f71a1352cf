//! Domain layer: value objects, entities, the hub state aggregate and the
//! ports the gateway needs from its collaborators.
//!
//! Nothing in here performs I/O. Traits in [`port`] are implemented by the
//! infrastructure layer.

pub mod entity;
pub mod error;
pub mod event;
pub mod hub_state;
pub mod port;
pub mod value_object;

pub use entity::ChatMessage;
pub use error::{
    ClaimError, MessagePushError, PublishError, QueueError, StoreError, ValueObjectError,
};
pub use event::{IncomingEvent, NAME_TAKEN_REASON, OutgoingEvent};
pub use hub_state::{ClaimedName, ConnectionPhase, HubState};
pub use port::{ChatMessagePublisher, MessageQueue, MessageStore, QueueMessage};
pub use value_object::{ConnectionId, DisplayName, MessageId, MessageIdFactory};
