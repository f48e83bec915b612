//! Tree assembly over the logical-topic hierarchy.
//!
//! ## Algorithm
//!
//! 1. Resolve the requested version id to its logical topic's current version
//! 2. Pop a node from the work stack and fetch the current version of each
//!    distinct child logical topic (one store query per node)
//! 3. Record every child not already placed and push it onto the stack
//! 4. Fold the flat node list into nested [`TopicTree`] nodes bottom-up
//!
//! A visited set of logical ids stops the walk on cyclic data, and the
//! explicit stack keeps deep hierarchies off the call stack.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{TopicError, TopicResult};
use crate::resolver::VersionResolver;
use crate::store::TopicStore;
use crate::types::{LogicalId, TopicId, TopicTree, TopicVersion};

/// A placed descendant awaiting assembly.
///
/// Slot 0 is the root; the descendant at list index `i` occupies slot `i + 1`.
struct PendingNode {
    topic: TopicVersion,
    parent_slot: usize,
}

/// Builds hierarchy snapshots containing only current versions.
pub struct TreeAssembler<S: TopicStore> {
    store: Arc<S>,
    resolver: VersionResolver<S>,
}

impl<S: TopicStore> TreeAssembler<S> {
    /// Create an assembler over a shared store.
    pub fn new(store: Arc<S>) -> Self {
        let resolver = VersionResolver::new(Arc::clone(&store));
        Self { store, resolver }
    }

    /// Build the tree rooted at the logical topic `version_id` belongs to.
    ///
    /// The root is that topic's current version even when `version_id`
    /// names an older one. Children at every level are the current
    /// versions of each distinct child logical topic, ordered by logical id.
    pub async fn build_tree(&self, version_id: &TopicId) -> TopicResult<TopicTree> {
        let root = self.resolver.resolve_latest_by_version_id(version_id).await?;

        let mut placed: HashSet<LogicalId> = HashSet::new();
        placed.insert(root.logical_id);
        let mut descendants: Vec<PendingNode> = Vec::new();
        let mut stack: Vec<(usize, LogicalId)> = vec![(0, root.logical_id)];

        while let Some((slot, logical_id)) = stack.pop() {
            let children = self
                .store
                .find_current_children(&logical_id)
                .await
                .map_err(TopicError::from_store)?;

            for child in children {
                let child_logical_id = child.logical_id;
                if !placed.insert(child_logical_id) {
                    tracing::trace!(
                        logical_id = %child_logical_id,
                        parent_logical_id = %logical_id,
                        "Skipping already placed topic (cyclic hierarchy)"
                    );
                    continue;
                }
                descendants.push(PendingNode { topic: child, parent_slot: slot });
                stack.push((descendants.len(), child_logical_id));
            }
        }

        tracing::debug!(
            root_logical_id = %root.logical_id,
            node_count = descendants.len() + 1,
            "Assembled topic tree"
        );
        Ok(assemble(root, descendants))
    }
}

/// Fold the flat descendant list into nested nodes under `root`.
///
/// A parent's slot is always smaller than its child's, so walking the
/// list backwards finishes all children before their parent.
fn assemble(root: TopicVersion, descendants: Vec<PendingNode>) -> TopicTree {
    let mut children: Vec<Vec<TopicTree>> = (0..=descendants.len()).map(|_| Vec::new()).collect();

    for (index, pending) in descendants.into_iter().enumerate().rev() {
        let node = TopicTree::new(
            pending.topic,
            in_discovery_order(std::mem::take(&mut children[index + 1])),
        );
        children[pending.parent_slot].push(node);
    }

    TopicTree::new(root, in_discovery_order(std::mem::take(&mut children[0])))
}

/// Children are collected back to front; flip them to discovery order.
fn in_discovery_order(mut nodes: Vec<TopicTree>) -> Vec<TopicTree> {
    nodes.reverse();
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryTopicStore;

    #[tokio::test]
    async fn test_leaf_has_empty_children() {
        let leaf = TopicVersion::first("Leaf", "x", None);
        let store = Arc::new(InMemoryTopicStore::with_records(vec![leaf.clone()]).unwrap());
        let tree = TreeAssembler::new(store).build_tree(&leaf.id).await.unwrap();

        assert_eq!(tree.topic, leaf);
        assert!(tree.children.is_empty());
    }

    #[tokio::test]
    async fn test_only_latest_child_versions() {
        let root = TopicVersion::first("Root", "r", None);
        let g1 = TopicVersion::first("G", "v1", Some(root.logical_id));
        let g2 = g1.successor("G", "v2");
        let h1 = TopicVersion::first("H", "v1", Some(root.logical_id));
        let store = Arc::new(InMemoryTopicStore::with_records(vec![
            root.clone(),
            g1.clone(),
            h1.clone(),
            g2.clone(),
        ]).unwrap());

        let tree = TreeAssembler::new(store).build_tree(&root.id).await.unwrap();

        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.child(&g1.logical_id).unwrap().topic, g2);
        assert_eq!(tree.child(&h1.logical_id).unwrap().topic, h1);
        assert!(tree.iter().all(|n| n.topic.id != g1.id));
    }

    #[tokio::test]
    async fn test_root_promoted_to_current_version() {
        let root_v1 = TopicVersion::first("Root", "old", None);
        let root_v2 = root_v1.successor("Root", "new");
        let child = TopicVersion::first("Child", "c", Some(root_v1.logical_id));
        let store = Arc::new(InMemoryTopicStore::with_records(vec![
            root_v1.clone(),
            child.clone(),
            root_v2.clone(),
        ]).unwrap());

        let tree = TreeAssembler::new(store).build_tree(&root_v1.id).await.unwrap();
        assert_eq!(tree.topic, root_v2);
        assert_eq!(tree.children.len(), 1);
    }

    #[tokio::test]
    async fn test_nested_levels() {
        let a = TopicVersion::first("A", "a", None);
        let b = TopicVersion::first("B", "b", Some(a.logical_id));
        let c = TopicVersion::first("C", "c", Some(b.logical_id));
        let store = Arc::new(InMemoryTopicStore::with_records(vec![a.clone(), b, c.clone()]).unwrap());

        let tree = TreeAssembler::new(store).build_tree(&a.id).await.unwrap();
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.children[0].children[0].topic, c);
    }

    #[tokio::test]
    async fn test_subtree_from_inner_node() {
        let a = TopicVersion::first("A", "a", None);
        let b = TopicVersion::first("B", "b", Some(a.logical_id));
        let c = TopicVersion::first("C", "c", Some(b.logical_id));
        let store = Arc::new(InMemoryTopicStore::with_records(vec![a, b.clone(), c]).unwrap());

        let tree = TreeAssembler::new(store).build_tree(&b.id).await.unwrap();
        assert_eq!(tree.topic, b);
        assert_eq!(tree.node_count(), 2);
    }

    #[tokio::test]
    async fn test_cycle_terminates() {
        // X and Y claim each other as parent, which the write path never produces.
        let x_lid = LogicalId::generate();
        let y_lid = LogicalId::generate();
        let mut x = TopicVersion::first("X", "x", Some(y_lid));
        x.logical_id = x_lid;
        let mut y = TopicVersion::first("Y", "y", Some(x_lid));
        y.logical_id = y_lid;
        let store = Arc::new(InMemoryTopicStore::with_records(vec![x.clone(), y.clone()]).unwrap());

        let tree = TreeAssembler::new(store).build_tree(&x.id).await.unwrap();
        assert_eq!(tree.node_count(), 2);
        assert_eq!(tree.children[0].topic, y);
        assert!(tree.children[0].children.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_root_is_not_found() {
        let store = Arc::new(InMemoryTopicStore::new());
        let err = TreeAssembler::new(store)
            .build_tree(&TopicId::generate())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_assemble_preserves_discovery_order() {
        let root = TopicVersion::first("root", "r", None);
        let first = TopicVersion::first("first", "1", Some(root.logical_id));
        let second = TopicVersion::first("second", "2", Some(root.logical_id));
        let nested = TopicVersion::first("nested", "n", Some(first.logical_id));
        let descendants = vec![
            PendingNode { topic: first.clone(), parent_slot: 0 },
            PendingNode { topic: second.clone(), parent_slot: 0 },
            PendingNode { topic: nested.clone(), parent_slot: 1 },
        ];

        let tree = assemble(root, descendants);
        assert_eq!(tree.children[0].topic, first);
        assert_eq!(tree.children[1].topic, second);
        assert_eq!(tree.children[0].children[0].topic, nested);
    }
}
