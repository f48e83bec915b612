//! Topic lifecycle: first versions, successor versions and history.

use std::sync::Arc;

use crate::error::{TopicError, TopicResult};
use crate::resolver::VersionResolver;
use crate::store::{TopicQuery, TopicStore};
use crate::types::{TopicId, TopicVersion};

/// Creates and versions topics.
///
/// No lock is held between reading the version being edited and inserting
/// its successor, so two concurrent updates of the same logical topic may
/// both produce the same version number.
pub struct TopicLifecycle<S: TopicStore> {
    store: Arc<S>,
    resolver: VersionResolver<S>,
}

impl<S: TopicStore> TopicLifecycle<S> {
    /// Create a lifecycle manager over a shared store.
    pub fn new(store: Arc<S>) -> Self {
        let resolver = VersionResolver::new(Arc::clone(&store));
        Self { store, resolver }
    }

    /// Create version 1 of a new logical topic.
    ///
    /// `parent_version_id` may name any version of the parent; it is resolved
    /// to the parent's logical id. A parent that does not resolve leaves the
    /// new topic without a parent instead of failing the creation.
    pub async fn create(
        &self,
        name: impl Into<String>,
        content: impl Into<String>,
        parent_version_id: Option<TopicId>,
    ) -> TopicResult<TopicVersion> {
        let parent_logical_id = match parent_version_id {
            Some(pid) => match self.resolver.find_latest_by_version_id(&pid).await? {
                Some(parent) => Some(parent.logical_id),
                None => {
                    tracing::trace!(parent_version_id = %pid, "Parent does not resolve, creating root topic");
                    None
                }
            },
            None => None,
        };

        let topic = TopicVersion::first(name, content, parent_logical_id);
        self.store
            .insert(topic.clone())
            .await
            .map_err(TopicError::from_store)?;

        tracing::debug!(
            topic_id = %topic.id,
            logical_id = %topic.logical_id,
            parent_logical_id = ?topic.parent_logical_id,
            root = topic.is_root(),
            "Created topic"
        );
        Ok(topic)
    }

    /// Append a new version superseding `version_id`.
    ///
    /// The version passed in is read directly, not via latest-resolution;
    /// the returned record is the new one.
    pub async fn update(
        &self,
        version_id: &TopicId,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> TopicResult<TopicVersion> {
        let previous = self.resolver.resolve_by_version_id(version_id).await?;
        let next = previous.successor(name, content);
        self.store
            .insert(next.clone())
            .await
            .map_err(TopicError::from_store)?;

        tracing::debug!(
            topic_id = %next.id,
            logical_id = %next.logical_id,
            version = next.version,
            superseded = %previous.id,
            "Created topic version"
        );
        Ok(next)
    }

    /// Every version of the logical topic `version_id` belongs to, newest first.
    ///
    /// An unknown id yields an empty history rather than an error.
    pub async fn list_versions(&self, version_id: &TopicId) -> TopicResult<Vec<TopicVersion>> {
        let Some(record) = self.resolver.find_by_version_id(version_id).await? else {
            return Ok(Vec::new());
        };

        self.store
            .find_all(&TopicQuery::versions_of(record.logical_id).newest_first())
            .await
            .map_err(TopicError::from_store)
    }

    /// The record with exactly this version id.
    pub async fn get(&self, version_id: &TopicId) -> TopicResult<TopicVersion> {
        self.resolver.resolve_by_version_id(version_id).await
    }

    /// Every stored version record, in storage order.
    pub async fn list_all(&self) -> TopicResult<Vec<TopicVersion>> {
        self.store
            .find_all(&TopicQuery::all())
            .await
            .map_err(TopicError::from_store)
    }
}
