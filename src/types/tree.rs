//! Materialized hierarchy snapshots.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use super::topic::{LogicalId, TopicVersion};

/// A node of a topic tree snapshot.
///
/// Every node holds the current version of its logical topic and one
/// child node per distinct child logical topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicTree {
    /// Current version of this node's logical topic.
    #[serde(flatten)]
    pub topic: TopicVersion,
    /// Child nodes in discovery order.
    pub children: Vec<TopicTree>,
}

impl TopicTree {
    /// Create a node over already assembled children.
    pub fn new(topic: TopicVersion, children: Vec<TopicTree>) -> Self {
        Self { topic, children }
    }

    /// Logical topic of this node.
    pub fn logical_id(&self) -> LogicalId {
        self.topic.logical_id
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes, this one included.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Number of levels below and including this node.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, depth)) = stack.pop() {
            if node.is_leaf() {
                max_depth = max_depth.max(depth);
            }
            stack.extend(node.children.iter().map(|c| (c, depth + 1)));
        }
        max_depth
    }

    /// Pre-order iteration over all nodes.
    pub fn iter(&self) -> TreeIter<'_> {
        TreeIter { stack: vec![self] }
    }

    /// Find the node of a given logical topic.
    pub fn find(&self, logical_id: &LogicalId) -> Option<&TopicTree> {
        self.iter().find(|node| node.logical_id() == *logical_id)
    }

    /// Find a direct child by logical topic.
    pub fn child(&self, logical_id: &LogicalId) -> Option<&TopicTree> {
        self.children.iter().find(|c| c.logical_id() == *logical_id)
    }

    /// Deterministic fingerprint of the snapshot.
    ///
    /// Changes whenever any node's current version or the child set changes.
    pub fn fingerprint(&self) -> String {
        canonical_hash_hex(self)
    }
}

/// Pre-order iterator over a [`TopicTree`].
pub struct TreeIter<'a> {
    stack: Vec<&'a TopicTree>,
}

impl<'a> Iterator for TreeIter<'a> {
    type Item = &'a TopicTree;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TopicTree {
        //      root
        //     /    \
        //    a      b
        //    |
        //    c
        let root = TopicVersion::first("root", "r", None);
        let a = TopicVersion::first("a", "a", Some(root.logical_id));
        let b = TopicVersion::first("b", "b", Some(root.logical_id));
        let c = TopicVersion::first("c", "c", Some(a.logical_id));

        let a_node = TopicTree::new(a, vec![TopicTree::new(c, Vec::new())]);
        TopicTree::new(root, vec![a_node, TopicTree::new(b, Vec::new())])
    }

    #[test]
    fn test_counts_and_depth() {
        let tree = sample();
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.depth(), 3);
        assert!(!tree.is_leaf());
        assert!(tree.children[1].is_leaf());
    }

    #[test]
    fn test_preorder_iteration() {
        let tree = sample();
        let names: Vec<_> = tree.iter().map(|n| n.topic.name.as_str()).collect();
        assert_eq!(names, vec!["root", "a", "c", "b"]);
    }

    #[test]
    fn test_find_nested_node() {
        let tree = sample();
        let c_id = tree.children[0].children[0].logical_id();
        assert_eq!(tree.find(&c_id).unwrap().topic.name, "c");
        assert!(tree.child(&c_id).is_none());
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let tree = sample();
        assert_eq!(tree.fingerprint(), tree.clone().fingerprint());

        let mut changed = tree.clone();
        changed.children[1].topic = changed.children[1].topic.successor("b", "edited");
        assert_ne!(tree.fingerprint(), changed.fingerprint());
    }
}
