//! Hub state aggregate.
//!
//! Holds the live connection set, the name index and the typing index. All
//! methods are synchronous and side-effect free beyond `self`; the hub control
//! loop is the only owner, so no locking happens here.
//!
//! Invariants (checked by [`HubState::is_consistent`]):
//! - every name in the name index maps to a live connection whose identity is that name
//! - every live connection with an identity appears in the name index exactly once
//! - typing index keys are a subset of the name index keys

use std::collections::{BTreeMap, HashMap};

use super::{
    error::ClaimError,
    value_object::{ConnectionId, DisplayName},
};

/// Where a live connection is in its lifecycle. Removed connections have no
/// phase; they are terminal and never come back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    /// Registered, no identity yet
    Connected,
    /// Identity claimed
    Named,
}

/// Result of a successful claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedName {
    pub name: DisplayName,
    /// Name the connection held before, now released
    pub released: Option<DisplayName>,
    /// Whether the released name was flagged as typing
    pub released_was_typing: bool,
}

#[derive(Debug, Default)]
pub struct HubState {
    connections: HashMap<ConnectionId, Option<DisplayName>>,
    names: HashMap<DisplayName, ConnectionId>,
    typing: BTreeMap<DisplayName, bool>,
}

impl HubState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to the live set. Returns `false` if it was already live.
    pub fn register(&mut self, connection_id: ConnectionId) -> bool {
        if self.connections.contains_key(&connection_id) {
            return false;
        }
        self.connections.insert(connection_id, None);
        true
    }

    /// Remove a connection and release its name.
    ///
    /// Returns `None` if the connection was not live, otherwise the identity it held.
    pub fn unregister(&mut self, connection_id: &ConnectionId) -> Option<Option<DisplayName>> {
        let identity = self.connections.remove(connection_id)?;
        if let Some(name) = &identity {
            self.names.remove(name);
            self.typing.remove(name);
        }
        Some(identity)
    }

    /// Claim `requested` for `connection_id` after trimming it.
    ///
    /// A name already in the index is rejected even when the requester owns it.
    pub fn claim_name(
        &mut self,
        connection_id: &ConnectionId,
        requested: &str,
    ) -> Result<ClaimedName, ClaimError> {
        if !self.connections.contains_key(connection_id) {
            return Err(ClaimError::UnknownConnection(*connection_id));
        }
        let name = DisplayName::parse(requested).map_err(|_| ClaimError::Empty)?;
        if self.names.contains_key(&name) {
            return Err(ClaimError::Taken(name.into_string()));
        }

        let released = self
            .connections
            .get_mut(connection_id)
            .and_then(|identity| identity.replace(name.clone()));
        let mut released_was_typing = false;
        if let Some(old) = &released {
            self.names.remove(old);
            released_was_typing = self.typing.remove(old).unwrap_or(false);
        }
        self.names.insert(name.clone(), *connection_id);

        Ok(ClaimedName {
            name,
            released,
            released_was_typing,
        })
    }

    /// Set the typing flag for a named connection.
    ///
    /// Returns the connection's name, or `None` (and changes nothing) when the
    /// connection is unknown or has no identity.
    pub fn set_typing(
        &mut self,
        connection_id: &ConnectionId,
        is_typing: bool,
    ) -> Option<DisplayName> {
        let name = self.identity(connection_id)?.clone();
        self.typing.insert(name.clone(), is_typing);
        Some(name)
    }

    pub fn identity(&self, connection_id: &ConnectionId) -> Option<&DisplayName> {
        self.connections.get(connection_id)?.as_ref()
    }

    pub fn phase(&self, connection_id: &ConnectionId) -> Option<ConnectionPhase> {
        self.connections.get(connection_id).map(|identity| {
            if identity.is_some() {
                ConnectionPhase::Named
            } else {
                ConnectionPhase::Connected
            }
        })
    }

    pub fn is_live(&self, connection_id: &ConnectionId) -> bool {
        self.connections.contains_key(connection_id)
    }

    pub fn owner_of(&self, name: &DisplayName) -> Option<ConnectionId> {
        self.names.get(name).copied()
    }

    pub fn live_count(&self) -> usize {
        self.connections.len()
    }

    /// Claimed names, sorted.
    pub fn user_list(&self) -> Vec<String> {
        let mut users: Vec<String> = self
            .names
            .keys()
            .map(|name| name.as_str().to_string())
            .collect();
        users.sort();
        users
    }

    /// Names currently flagged as typing, sorted.
    pub fn typing_list(&self) -> Vec<String> {
        self.typing
            .iter()
            .filter(|(_, is_typing)| **is_typing)
            .map(|(name, _)| name.as_str().to_string())
            .collect()
    }

    /// Drop every connection and index entry.
    pub fn clear(&mut self) {
        self.connections.clear();
        self.names.clear();
        self.typing.clear();
    }

    pub fn is_consistent(&self) -> bool {
        let names_point_to_owners = self.names.iter().all(|(name, owner)| {
            self.connections
                .get(owner)
                .is_some_and(|identity| identity.as_ref() == Some(name))
        });
        let named_connections = self
            .connections
            .values()
            .filter(|identity| identity.is_some())
            .count();
        let typing_subset = self.typing.keys().all(|name| self.names.contains_key(name));

        names_point_to_owners && named_connections == self.names.len() && typing_subset
    }
}
