//! Error taxonomy for trigger resolution

use thiserror::Error;

/// Failures that abort a trigger describe.
///
/// A missing source is deliberately absent from this list: it is a valid
/// [`SourceResolution`](super::SourceResolution), not an error.
#[derive(Debug, Error)]
pub enum EventsError {
    /// The selected platform cannot run eventing workloads
    #[error("Events are only available on cluster-backed platforms, not [{platform}].")]
    UnsupportedPlatform { platform: String },

    #[error("Trigger [{name}] not found.")]
    TriggerNotFound { name: String },

    #[error("Failed to connect to the cluster: {0:#}")]
    Connect(#[source] anyhow::Error),

    /// A read against the cluster failed; passed through without retry
    #[error("{0:#}")]
    Transport(#[source] anyhow::Error),

    #[error("Operation cancelled")]
    Cancelled,
}

impl EventsError {
    /// Configuration errors can never succeed on retry
    pub fn is_configuration(&self) -> bool {
        matches!(self, EventsError::UnsupportedPlatform { .. })
    }
}

/// Result type for trigger resolution
pub type EventsResult<T> = Result<T, EventsError>;
