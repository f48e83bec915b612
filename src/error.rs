//! Error type shared by the core components.

use crate::types::{LogicalId, TopicId};

/// Error type for topic graph operations.
///
/// Dangling parent references are deliberately absent: they are treated
/// as "no parent" on creation and "no edge" during traversal.
#[derive(Debug, thiserror::Error)]
pub enum TopicError {
    /// No record has this version id.
    #[error("Topic version not found: {0}")]
    VersionNotFound(TopicId),
    /// The logical topic has no stored versions.
    #[error("Logical topic has no versions: {0}")]
    LogicalTopicNotFound(LogicalId),
    /// Both endpoints exist but are not connected.
    #[error("No path between logical topics {start} and {end}")]
    NoPath {
        /// Logical topic the search started from.
        start: LogicalId,
        /// Logical topic that could not be reached.
        end: LogicalId,
    },
    /// Storage backend failure, propagated with its original error as source.
    #[error("Store error: {0}")]
    StoreError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TopicError {
    /// Wrap a storage backend error.
    pub fn from_store<E>(e: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::StoreError(Box::new(e))
    }

    /// Whether this is one of the not-found outcomes.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::VersionNotFound(_) | Self::LogicalTopicNotFound(_))
    }

    /// Whether the endpoints exist but are disconnected.
    pub fn is_no_path(&self) -> bool {
        matches!(self, Self::NoPath { .. })
    }
}

/// Result alias for topic graph operations.
pub type TopicResult<T> = Result<T, TopicError>;
