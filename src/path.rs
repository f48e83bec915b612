//! Shortest-path search over the logical-topic hierarchy.
//!
//! ## Algorithm
//!
//! Breadth-first search over the *undirected* parent/child graph of
//! logical topics:
//!
//! 1. Resolve both endpoints to their current versions
//! 2. Seed a FIFO frontier with the start topic
//! 3. Dequeue a node; stop if its logical id is the target's
//! 4. Otherwise mark it visited (on dequeue, not on enqueue) and enqueue
//!    the current version of its parent and of each distinct child logical
//!    topic that has not been visited yet
//! 5. An exhausted frontier means the endpoints are disconnected
//!
//! Frontier entries point at a predecessor in a hop arena instead of
//! carrying a copy of the whole path; walking the predecessor chain of
//! the target rebuilds the path. The visited set is keyed by logical id,
//! so different versions of one topic are never distinct nodes.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use crate::error::{TopicError, TopicResult};
use crate::resolver::VersionResolver;
use crate::store::TopicStore;
use crate::types::{LogicalId, TopicId, TopicPath, TopicVersion};

/// One discovered hop: a current version and where it was reached from.
struct Hop {
    topic: TopicVersion,
    previous: Option<usize>,
}

/// Computes hop-count shortest paths between topics.
pub struct PathFinder<S: TopicStore> {
    store: Arc<S>,
    resolver: VersionResolver<S>,
}

impl<S: TopicStore> PathFinder<S> {
    /// Create a path finder over a shared store.
    pub fn new(store: Arc<S>) -> Self {
        let resolver = VersionResolver::new(Arc::clone(&store));
        Self { store, resolver }
    }

    /// Shortest path from the logical topic of `start` to that of `end`.
    ///
    /// Both ids may name any version; every entry of the result is the
    /// current version of its logical topic. Fails with a not-found error
    /// if either endpoint does not resolve and with `NoPath` if they are
    /// in disconnected parts of the forest.
    pub async fn shortest_path(&self, start: &TopicId, end: &TopicId) -> TopicResult<TopicPath> {
        let start = self.resolver.resolve_latest_by_version_id(start).await?;
        let end = self.resolver.resolve_latest_by_version_id(end).await?;
        let target = end.logical_id;

        if start.same_topic(&end) {
            return Ok(TopicPath::new(vec![start]));
        }

        let origin = start.logical_id;
        let mut hops = vec![Hop { topic: start, previous: None }];
        let mut frontier: VecDeque<usize> = VecDeque::from([0]);
        let mut visited: HashSet<LogicalId> = HashSet::new();

        while let Some(index) = frontier.pop_front() {
            let current = hops[index].topic.clone();

            if current.logical_id == target {
                let path = trace_back(&hops, index);
                tracing::debug!(
                    start_logical_id = %origin,
                    end_logical_id = %target,
                    hops = path.hop_count(),
                    "Found shortest path"
                );
                return Ok(path);
            }

            if !visited.insert(current.logical_id) {
                continue;
            }

            for neighbor in self.neighbors(&current).await? {
                if visited.contains(&neighbor.logical_id) {
                    continue;
                }
                frontier.push_back(hops.len());
                hops.push(Hop { topic: neighbor, previous: Some(index) });
            }
        }

        tracing::debug!(
            start_logical_id = %origin,
            end_logical_id = %target,
            explored = visited.len(),
            "No path between topics"
        );
        Err(TopicError::NoPath { start: origin, end: target })
    }

    /// Current versions adjacent to `topic`: its parent first, then its children.
    ///
    /// A parent reference that no longer resolves contributes no edge.
    async fn neighbors(&self, topic: &TopicVersion) -> TopicResult<Vec<TopicVersion>> {
        let mut neighbors = Vec::new();

        if let Some(parent_id) = topic.parent_logical_id {
            match self.resolver.find_latest_by_logical_id(&parent_id).await? {
                Some(parent) => neighbors.push(parent),
                None => tracing::trace!(
                    logical_id = %topic.logical_id,
                    parent_logical_id = %parent_id,
                    "Dangling parent reference"
                ),
            }
        }

        let children = self
            .store
            .find_current_children(&topic.logical_id)
            .await
            .map_err(TopicError::from_store)?;
        neighbors.extend(children);

        Ok(neighbors)
    }
}

/// Follow predecessor links from `index` back to the start.
fn trace_back(hops: &[Hop], index: usize) -> TopicPath {
    let mut path = Vec::new();
    let mut cursor = Some(index);
    while let Some(i) = cursor {
        path.push(hops[i].topic.clone());
        cursor = hops[i].previous;
    }
    path.reverse();
    TopicPath::new(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryTopicStore;

    /// A
    /// ├── B
    /// │   └── C
    /// └── D
    ///     └── E
    struct Forest {
        store: Arc<InMemoryTopicStore>,
        a: TopicVersion,
        b: TopicVersion,
        c: TopicVersion,
        d: TopicVersion,
        e: TopicVersion,
    }

    fn forest() -> Forest {
        let a = TopicVersion::first("A", "a", None);
        let b = TopicVersion::first("B", "b", Some(a.logical_id));
        let c = TopicVersion::first("C", "c", Some(b.logical_id));
        let d = TopicVersion::first("D", "d", Some(a.logical_id));
        let e = TopicVersion::first("E", "e", Some(d.logical_id));
        let store = Arc::new(InMemoryTopicStore::with_records(vec![
            a.clone(),
            b.clone(),
            c.clone(),
            d.clone(),
            e.clone(),
        ]).unwrap());
        Forest { store, a, b, c, d, e }
    }

    fn names(path: &TopicPath) -> Vec<&str> {
        path.hops().iter().map(|t| t.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_path_down_the_hierarchy() {
        let f = forest();
        let finder = PathFinder::new(f.store);
        let path = finder.shortest_path(&f.a.id, &f.c.id).await.unwrap();
        assert_eq!(names(&path), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_path_through_shared_ancestor() {
        let f = forest();
        let finder = PathFinder::new(f.store);
        let path = finder.shortest_path(&f.d.id, &f.c.id).await.unwrap();
        assert_eq!(names(&path), vec!["D", "A", "B", "C"]);
        assert_eq!(path.hop_count(), 3);
    }

    #[tokio::test]
    async fn test_path_across_subtrees() {
        let f = forest();
        let finder = PathFinder::new(f.store);
        let path = finder.shortest_path(&f.e.id, &f.c.id).await.unwrap();
        assert_eq!(names(&path), vec!["E", "D", "A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_same_logical_topic_is_single_hop() {
        let f = forest();
        let b2 = f.b.successor("B2", "edited");
        f.store.put(b2.clone()).unwrap();
        let finder = PathFinder::new(f.store);

        let path = finder.shortest_path(&f.b.id, &b2.id).await.unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path.hops()[0], b2);

        let same = finder.shortest_path(&f.a.id, &f.a.id).await.unwrap();
        assert_eq!(same.len(), 1);
    }

    #[tokio::test]
    async fn test_path_uses_current_versions() {
        let f = forest();
        let b2 = f.b.successor("B-current", "edited");
        f.store.put(b2.clone()).unwrap();
        let finder = PathFinder::new(f.store);

        let path = finder.shortest_path(&f.a.id, &f.c.id).await.unwrap();
        assert_eq!(path.hops()[1], b2);
    }

    #[tokio::test]
    async fn test_disjoint_trees_have_no_path() {
        let f = forest();
        let island = TopicVersion::first("Island", "i", None);
        f.store.put(island.clone()).unwrap();
        let finder = PathFinder::new(f.store);

        let err = finder.shortest_path(&f.c.id, &island.id).await.unwrap_err();
        assert!(err.is_no_path());
    }

    #[tokio::test]
    async fn test_dangling_parent_is_no_edge() {
        let orphan = TopicVersion::first("Orphan", "o", Some(LogicalId::generate()));
        let other = TopicVersion::first("Other", "x", None);
        let store = Arc::new(InMemoryTopicStore::with_records(vec![orphan.clone(), other.clone()]).unwrap());
        let finder = PathFinder::new(store);

        let err = finder.shortest_path(&orphan.id, &other.id).await.unwrap_err();
        assert!(err.is_no_path());
    }

    #[tokio::test]
    async fn test_cycle_terminates() {
        // X and Y claim each other as parent; Z is unrelated.
        let x_lid = LogicalId::generate();
        let y_lid = LogicalId::generate();
        let mut x = TopicVersion::first("X", "x", Some(y_lid));
        x.logical_id = x_lid;
        let mut y = TopicVersion::first("Y", "y", Some(x_lid));
        y.logical_id = y_lid;
        let z = TopicVersion::first("Z", "z", None);
        let store = Arc::new(
            InMemoryTopicStore::with_records(vec![x.clone(), y.clone(), z.clone()]).unwrap(),
        );
        let finder = PathFinder::new(store);

        let path = finder.shortest_path(&x.id, &y.id).await.unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.logical_ids(), vec![x_lid, y_lid]);

        let err = finder.shortest_path(&x.id, &z.id).await.unwrap_err();
        assert!(err.is_no_path());
    }

    #[tokio::test]
    async fn test_unknown_endpoint_is_not_found() {
        let f = forest();
        let finder = PathFinder::new(f.store);

        let err = finder.shortest_path(&f.a.id, &TopicId::generate()).await.unwrap_err();
        assert!(err.is_not_found());
        let err = finder.shortest_path(&TopicId::generate(), &f.a.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_trace_back_orders_start_to_end() {
        let a = TopicVersion::first("a", "", None);
        let b = TopicVersion::first("b", "", Some(a.logical_id));
        let hops = vec![
            Hop { topic: a.clone(), previous: None },
            Hop { topic: b.clone(), previous: Some(0) },
        ];
        assert_eq!(trace_back(&hops, 1).into_hops(), vec![a, b]);
    }
}
