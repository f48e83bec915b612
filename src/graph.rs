//! Facade over the core components.

use std::sync::Arc;

use crate::error::TopicResult;
use crate::lifecycle::TopicLifecycle;
use crate::path::PathFinder;
use crate::resolver::VersionResolver;
use crate::store::TopicStore;
use crate::tree::TreeAssembler;
use crate::types::{LogicalId, TopicId, TopicPath, TopicTree, TopicVersion};

/// All topic operations over one shared store handle.
///
/// The store is injected at construction; opening and closing it is the
/// caller's concern.
pub struct TopicGraph<S: TopicStore> {
    store: Arc<S>,
    resolver: VersionResolver<S>,
    lifecycle: TopicLifecycle<S>,
    trees: TreeAssembler<S>,
    paths: PathFinder<S>,
}

impl<S: TopicStore> TopicGraph<S> {
    /// Build every component over `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            resolver: VersionResolver::new(Arc::clone(&store)),
            lifecycle: TopicLifecycle::new(Arc::clone(&store)),
            trees: TreeAssembler::new(Arc::clone(&store)),
            paths: PathFinder::new(Arc::clone(&store)),
            store,
        }
    }

    /// Create version 1 of a new topic, optionally nested under a parent.
    pub async fn create(
        &self,
        name: impl Into<String>,
        content: impl Into<String>,
        parent_version_id: Option<TopicId>,
    ) -> TopicResult<TopicVersion> {
        self.lifecycle.create(name, content, parent_version_id).await
    }

    /// Append a new version superseding `version_id`.
    pub async fn update(
        &self,
        version_id: &TopicId,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> TopicResult<TopicVersion> {
        self.lifecycle.update(version_id, name, content).await
    }

    /// The record with exactly this version id.
    pub async fn get(&self, version_id: &TopicId) -> TopicResult<TopicVersion> {
        self.lifecycle.get(version_id).await
    }

    /// Every stored version record.
    pub async fn list_all(&self) -> TopicResult<Vec<TopicVersion>> {
        self.lifecycle.list_all().await
    }

    /// Version history of a topic, newest first.
    pub async fn list_versions(&self, version_id: &TopicId) -> TopicResult<Vec<TopicVersion>> {
        self.lifecycle.list_versions(version_id).await
    }

    /// Current version of the logical topic `version_id` belongs to.
    pub async fn latest(&self, version_id: &TopicId) -> TopicResult<TopicVersion> {
        self.resolver.resolve_latest_by_version_id(version_id).await
    }

    /// Current version of a logical topic.
    pub async fn latest_by_logical_id(&self, logical_id: &LogicalId) -> TopicResult<TopicVersion> {
        self.resolver.resolve_latest_by_logical_id(logical_id).await
    }

    /// Tree snapshot rooted at the topic of `version_id`.
    pub async fn build_tree(&self, version_id: &TopicId) -> TopicResult<TopicTree> {
        self.trees.build_tree(version_id).await
    }

    /// Shortest hop sequence between two topics.
    pub async fn shortest_path(&self, start: &TopicId, end: &TopicId) -> TopicResult<TopicPath> {
        self.paths.shortest_path(start, end).await
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryTopicStore;

    #[tokio::test]
    async fn test_end_to_end_through_facade() {
        let graph = TopicGraph::new(Arc::new(InMemoryTopicStore::new()));

        let root = graph.create("Systems", "root", None).await.unwrap();
        let child = graph.create("Kernels", "v1", Some(root.id)).await.unwrap();
        let child_v2 = graph.update(&child.id, "Kernels", "v2").await.unwrap();

        let tree = graph.build_tree(&root.id).await.unwrap();
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].topic, child_v2);

        let path = graph.shortest_path(&child.id, &root.id).await.unwrap();
        assert_eq!(path.logical_ids(), vec![child.logical_id, root.logical_id]);

        assert_eq!(graph.latest(&child.id).await.unwrap(), child_v2);
        assert_eq!(graph.latest_by_logical_id(&child.logical_id).await.unwrap(), child_v2);
        assert_eq!(graph.get(&child.id).await.unwrap(), child);
        assert_eq!(graph.list_versions(&child_v2.id).await.unwrap().len(), 2);
        assert_eq!(graph.list_all().await.unwrap().len(), 3);
        assert_eq!(graph.store().len(), 3);
    }
}
