//! Value objects.

use std::{collections::HashSet, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use natter_shared::time::compact_millis;
use uuid::Uuid;

use super::error::ValueObjectError;

/// Identity of one live connection.
///
/// Display names can be released and re-claimed, so the hub keys connections
/// by this id instead. A reconnect always gets a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConnectionId {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ValueObjectError::InvalidConnectionId(s.to_string()))
    }
}

/// A claimed display name: trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayName(String);

impl DisplayName {
    /// Trim surrounding whitespace and validate.
    ///
    /// # Errors
    ///
    /// Returns `ValueObjectError::EmptyDisplayName` if nothing is left after trimming.
    pub fn parse(raw: &str) -> Result<Self, ValueObjectError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyDisplayName);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Chat message id, `<yyyymmddHHMMSS.mmm>-<author>` with an optional `-<n>`
/// suffix when that id was already issued within the same millisecond.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyMessageId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issues message ids. Owned by the hub, so calls are already serialized.
///
/// Remembers every id issued during the current millisecond; a repeat gets the
/// smallest `-<n>` suffix that is still free.
#[derive(Debug, Default)]
pub struct MessageIdFactory {
    millis: String,
    issued: HashSet<String>,
}

impl MessageIdFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, at: DateTime<Utc>, author: &DisplayName) -> MessageId {
        let millis = compact_millis(at);
        if millis != self.millis {
            self.issued.clear();
            self.millis = millis;
        }

        let base = format!("{}-{}", self.millis, author.as_str());
        let mut candidate = base.clone();
        let mut sequence = 0u32;
        while self.issued.contains(&candidate) {
            sequence += 1;
            candidate = format!("{}-{}", base, sequence);
        }
        self.issued.insert(candidate.clone());
        MessageId(candidate)
    }
}
