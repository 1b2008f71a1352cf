use thiserror::Error;

/// Errors returned by [`super::HubHandle`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    #[error("hub is no longer running")]
    Closed,
}
