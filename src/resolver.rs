//! Version resolution.
//!
//! Callers hand back whichever version id they last saw; hierarchy and
//! path operations always need the *current* record of that logical
//! topic. The resolver bridges the two with a two-step lookup:
//!
//! ```text
//! TopicId ──find_by_id──▶ TopicVersion.logical_id ──latest──▶ current TopicVersion
//! ```
//!
//! The `find_*` methods report a missing record as `Ok(None)` and are used
//! where a dangling reference must not fail the operation. The `resolve_*`
//! methods turn absence into a not-found error. Store failures propagate
//! from both.

use std::sync::Arc;

use crate::error::{TopicError, TopicResult};
use crate::store::{TopicQuery, TopicStore};
use crate::types::{LogicalId, TopicId, TopicVersion};

/// Resolves version ids and logical ids to stored records.
pub struct VersionResolver<S: TopicStore> {
    store: Arc<S>,
}

impl<S: TopicStore> VersionResolver<S> {
    /// Create a resolver over a shared store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Record with exactly this version id, if stored.
    pub async fn find_by_version_id(&self, id: &TopicId) -> TopicResult<Option<TopicVersion>> {
        self.store.find_by_id(id).await.map_err(TopicError::from_store)
    }

    /// Highest-version record of a logical topic, if it has any.
    pub async fn find_latest_by_logical_id(
        &self,
        logical_id: &LogicalId,
    ) -> TopicResult<Option<TopicVersion>> {
        self.store
            .find_one(&TopicQuery::versions_of(*logical_id).newest_first())
            .await
            .map_err(TopicError::from_store)
    }

    /// Current record of the logical topic `id` belongs to, if both steps resolve.
    pub async fn find_latest_by_version_id(&self, id: &TopicId) -> TopicResult<Option<TopicVersion>> {
        match self.find_by_version_id(id).await? {
            Some(record) => self.find_latest_by_logical_id(&record.logical_id).await,
            None => Ok(None),
        }
    }

    /// Record with exactly this version id.
    pub async fn resolve_by_version_id(&self, id: &TopicId) -> TopicResult<TopicVersion> {
        self.find_by_version_id(id)
            .await?
            .ok_or(TopicError::VersionNotFound(*id))
    }

    /// Highest-version record of a logical topic.
    pub async fn resolve_latest_by_logical_id(&self, logical_id: &LogicalId) -> TopicResult<TopicVersion> {
        self.find_latest_by_logical_id(logical_id)
            .await?
            .ok_or(TopicError::LogicalTopicNotFound(*logical_id))
    }

    /// Current record of the logical topic `id` belongs to.
    ///
    /// Fails with `VersionNotFound` if `id` is unknown and with
    /// `LogicalTopicNotFound` if its logical topic has no surviving record.
    pub async fn resolve_latest_by_version_id(&self, id: &TopicId) -> TopicResult<TopicVersion> {
        let record = self.resolve_by_version_id(id).await?;
        self.resolve_latest_by_logical_id(&record.logical_id).await
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: TopicStore> Clone for VersionResolver<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store) }
    }
}
