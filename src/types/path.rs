//! Shortest-path results.

use serde::{Deserialize, Serialize};

use super::topic::{LogicalId, TopicVersion};

/// Hop sequence between two logical topics, endpoints included.
///
/// Each entry is the current version of the logical topic at that hop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicPath {
    hops: Vec<TopicVersion>,
}

impl TopicPath {
    /// Wrap an ordered hop sequence.
    pub fn new(hops: Vec<TopicVersion>) -> Self {
        Self { hops }
    }

    /// Number of topics on the path.
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    /// Whether the path has no entries.
    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.hops.len().saturating_sub(1)
    }

    /// First topic on the path.
    pub fn start(&self) -> Option<&TopicVersion> {
        self.hops.first()
    }

    /// Last topic on the path.
    pub fn end(&self) -> Option<&TopicVersion> {
        self.hops.last()
    }

    /// Topics on the path, start to end.
    pub fn hops(&self) -> &[TopicVersion] {
        &self.hops
    }

    /// Logical topic sequence, start to end.
    pub fn logical_ids(&self) -> Vec<LogicalId> {
        self.hops.iter().map(|t| t.logical_id).collect()
    }

    /// Consume into the hop sequence.
    pub fn into_hops(self) -> Vec<TopicVersion> {
        self.hops
    }
}

impl IntoIterator for TopicPath {
    type Item = TopicVersion;
    type IntoIter = std::vec::IntoIter<TopicVersion>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_hops().into_iter()
    }
}
