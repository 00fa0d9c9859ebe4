//! Domain-specific errors.

use std::path::PathBuf;

use thiserror::Error;

/// The host's selection capability could not answer.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("selection provider unavailable: {0}")]
    Unavailable(String),
    #[error("selection provider returned invalid data: {0}")]
    InvalidData(String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no selection available")]
    NoSelectionAvailable {
        #[source]
        cause: Option<ProviderError>,
    },
}

impl ResolveError {
    pub(crate) fn empty() -> Self {
        ResolveError::NoSelectionAvailable { cause: None }
    }
}

impl From<ProviderError> for ResolveError {
    fn from(value: ProviderError) -> Self {
        ResolveError::NoSelectionAvailable { cause: Some(value) }
    }
}

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("no shell could be started (tried: {})", .attempted.join(", "))]
    NoShellAvailable { attempted: Vec<String> },
    #[error("working directory is not a directory: {}", .0.display())]
    InvalidDirectory(PathBuf),
}
