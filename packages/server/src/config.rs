//! Server configuration.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAILBOX_CAPACITY: usize = 32;
pub const DEFAULT_HUB_BUFFER: usize = 1024;
pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const DEFAULT_VISIBILITY_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Outbound events buffered per connection before it is evicted
    pub mailbox_capacity: usize,
    /// Commands buffered in front of the hub control loop
    pub hub_buffer: usize,
    /// Messages returned by `GET /history`
    pub history_limit: usize,
    /// How long a received queue message stays invisible before redelivery
    pub visibility_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            hub_buffer: DEFAULT_HUB_BUFFER,
            history_limit: DEFAULT_HISTORY_LIMIT,
            visibility_timeout: Duration::from_secs(DEFAULT_VISIBILITY_TIMEOUT_SECS),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mailbox_capacity == 0 {
            return Err(ConfigError::Zero("mailbox capacity"));
        }
        if self.hub_buffer == 0 {
            return Err(ConfigError::Zero("hub buffer"));
        }
        if self.history_limit == 0 {
            return Err(ConfigError::Zero("history limit"));
        }
        if self.visibility_timeout.is_zero() {
            return Err(ConfigError::Zero("visibility timeout"));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
