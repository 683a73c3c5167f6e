//! Container error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ContainerError>;

/// Failure reported by an external render backend
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct BackendError {
    message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors surfaced through the container's error callback
///
/// All of these are recoverable: the pending frame stays queued and the next
/// tick re-encodes the full scene snapshot.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("backend apply failed")]
    BackendApply(#[source] BackendError),

    #[error("backend render failed")]
    BackendRender(#[source] BackendError),
}
