//! In-memory topic store for testing and embedding.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::types::{LogicalId, TopicId, TopicVersion};
use super::{TopicFilter, TopicQuery, TopicStore, VersionOrder};

/// Error type for in-memory store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InMemoryError {
    /// A record with this id is already stored.
    #[error("Duplicate topic version id: {0}")]
    DuplicateId(TopicId),
}

#[derive(Debug, Default)]
struct Tables {
    /// Records in insertion order.
    records: Vec<TopicVersion>,
    /// Version id -> position in `records`.
    by_id: HashMap<TopicId, usize>,
    /// Logical id -> positions of its versions.
    by_logical: BTreeMap<LogicalId, Vec<usize>>,
    /// Parent logical id -> positions of child records.
    by_parent: BTreeMap<LogicalId, Vec<usize>>,
}

impl Tables {
    fn positions(&self, filter: &TopicFilter) -> Vec<usize> {
        match filter {
            TopicFilter::All => (0..self.records.len()).collect(),
            TopicFilter::Id(id) => self.by_id.get(id).copied().into_iter().collect(),
            TopicFilter::LogicalId(lid) => self.by_logical.get(lid).cloned().unwrap_or_default(),
            TopicFilter::ParentLogicalId(pid) => self.by_parent.get(pid).cloned().unwrap_or_default(),
        }
    }
}

/// In-memory topic store.
///
/// Unordered queries return records in insertion order; ordered queries
/// sort stably by version, so equal versions keep insertion order.
/// Interior locking makes it shareable behind an `Arc`.
#[derive(Debug, Default)]
pub struct InMemoryTopicStore {
    tables: RwLock<Tables>,
}

impl InMemoryTopicStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with records.
    ///
    /// Fails on the first record whose id is already stored.
    pub fn with_records(
        records: impl IntoIterator<Item = TopicVersion>,
    ) -> Result<Self, InMemoryError> {
        let store = Self::new();
        for record in records {
            store.put(record)?;
        }
        Ok(store)
    }

    /// Insert a record synchronously.
    pub fn put(&self, record: TopicVersion) -> Result<(), InMemoryError> {
        let mut tables = self.tables.write();
        if tables.by_id.contains_key(&record.id) {
            return Err(InMemoryError::DuplicateId(record.id));
        }

        let pos = tables.records.len();
        tables.by_id.insert(record.id, pos);
        tables.by_logical.entry(record.logical_id).or_default().push(pos);
        if let Some(parent) = record.parent_logical_id {
            tables.by_parent.entry(parent).or_default().push(pos);
        }
        tables.records.push(record);
        Ok(())
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.tables.read().records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TopicStore for InMemoryTopicStore {
    type Error = InMemoryError;

    async fn insert(&self, record: TopicVersion) -> Result<(), Self::Error> {
        self.put(record)
    }

    async fn find_by_id(&self, id: &TopicId) -> Result<Option<TopicVersion>, Self::Error> {
        let tables = self.tables.read();
        Ok(tables.by_id.get(id).map(|&pos| tables.records[pos].clone()))
    }

    async fn find_all(&self, query: &TopicQuery) -> Result<Vec<TopicVersion>, Self::Error> {
        let tables = self.tables.read();
        let mut result: Vec<TopicVersion> = tables
            .positions(&query.filter)
            .into_iter()
            .map(|pos| tables.records[pos].clone())
            .collect();
        drop(tables);

        match query.order {
            Some(VersionOrder::Ascending) => result.sort_by(|a, b| a.version.cmp(&b.version)),
            Some(VersionOrder::Descending) => result.sort_by(|a, b| b.version.cmp(&a.version)),
            None => {}
        }
        if let Some(limit) = query.limit {
            result.truncate(limit);
        }
        Ok(result)
    }
}
