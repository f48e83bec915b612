//! Topic storage backends.
//!
//! The core depends only on [`TopicStore`]; connection lifecycle belongs
//! to whoever constructs the backend.

pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::{LogicalId, TopicId, TopicVersion};

/// Which records a query selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TopicFilter {
    /// Every stored record.
    All,
    /// The record with this version id.
    Id(TopicId),
    /// Every version of one logical topic.
    LogicalId(LogicalId),
    /// Every version of every logical topic nested under this one.
    ParentLogicalId(LogicalId),
}

/// Ordering by version number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VersionOrder {
    /// Oldest version first.
    Ascending,
    /// Newest version first.
    Descending,
}

/// A filtered, optionally ordered and limited record query.
///
/// An ordered query with a limit is the "latest-N" query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicQuery {
    /// Record selection.
    pub filter: TopicFilter,
    /// Version ordering; `None` leaves storage order.
    pub order: Option<VersionOrder>,
    /// Maximum number of records to return.
    pub limit: Option<usize>,
}

impl TopicQuery {
    /// Query with the given filter, unordered and unlimited.
    pub fn new(filter: TopicFilter) -> Self {
        Self { filter, order: None, limit: None }
    }

    /// Every stored record.
    pub fn all() -> Self {
        Self::new(TopicFilter::All)
    }

    /// Every version of a logical topic.
    pub fn versions_of(logical_id: LogicalId) -> Self {
        Self::new(TopicFilter::LogicalId(logical_id))
    }

    /// Every version of every logical topic under `parent`.
    pub fn children_of(parent: LogicalId) -> Self {
        Self::new(TopicFilter::ParentLogicalId(parent))
    }

    /// Set the version ordering.
    pub fn order_by(mut self, order: VersionOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Order newest version first.
    pub fn newest_first(self) -> Self {
        self.order_by(VersionOrder::Descending)
    }

    /// Cap the number of returned records.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Storage Port for topic version records.
///
/// Implementations provide atomic single-call inserts and lookups; the
/// core never holds locks across calls.
#[async_trait]
pub trait TopicStore: Send + Sync {
    /// Error type for store operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist a new record.
    async fn insert(&self, record: TopicVersion) -> Result<(), Self::Error>;

    /// Point lookup by version id.
    async fn find_by_id(&self, id: &TopicId) -> Result<Option<TopicVersion>, Self::Error>;

    /// Filtered list honouring the query's order and limit.
    async fn find_all(&self, query: &TopicQuery) -> Result<Vec<TopicVersion>, Self::Error>;

    /// First record of the query's result, if any.
    async fn find_one(&self, query: &TopicQuery) -> Result<Option<TopicVersion>, Self::Error> {
        let limited = query.clone().limit(1);
        Ok(self.find_all(&limited).await?.into_iter().next())
    }

    /// Current version of every distinct logical topic nested under `parent`.
    ///
    /// Ordered by logical id. The default fetches all child records newest
    /// first and keeps the first record seen per logical id; backends with
    /// a native distinct-on primitive should override it.
    async fn find_current_children(
        &self,
        parent: &LogicalId,
    ) -> Result<Vec<TopicVersion>, Self::Error> {
        let records = self
            .find_all(&TopicQuery::children_of(*parent).newest_first())
            .await?;
        Ok(latest_per_logical_id(records))
    }

    /// Whether the backend is reachable.
    async fn is_healthy(&self) -> bool {
        true
    }

    /// Connection pool statistics, for backends that pool connections.
    fn pool_stats(&self) -> Option<PoolStats> {
        None
    }
}

/// Pool statistics for monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Current pool size.
    pub size: u32,
    /// Number of idle connections.
    pub idle: usize,
    /// Maximum pool size.
    pub max: u32,
}

/// Reduce newest-first records to one per logical id, sorted by logical id.
///
/// Input must already be ordered by version descending within each
/// logical id; the first record encountered wins.
pub fn latest_per_logical_id(records: Vec<TopicVersion>) -> Vec<TopicVersion> {
    let mut seen: HashSet<LogicalId> = HashSet::new();
    let mut latest: Vec<TopicVersion> = records
        .into_iter()
        .filter(|r| seen.insert(r.logical_id))
        .collect();
    latest.sort_by(|a, b| a.logical_id.cmp(&b.logical_id));
    latest
}

pub use memory::InMemoryTopicStore;

#[cfg(feature = "postgres")]
pub use postgres::PostgresTopicStore;
