//! Shared service state.

use std::sync::Arc;

use crate::graph::TopicGraph;
use crate::store::TopicStore;

/// Shared service state.
///
/// Holds the topic graph and the store it was built over.
pub struct ServiceState<S: TopicStore + 'static> {
    /// Topic operations.
    pub graph: Arc<TopicGraph<S>>,
    /// The store backing `graph`, for health checks.
    pub store: Arc<S>,
}

impl<S: TopicStore + 'static> ServiceState<S> {
    /// Create service state over a store.
    pub fn new(store: S) -> Self {
        Self::from_shared(Arc::new(store))
    }

    /// Create service state over an already shared store.
    pub fn from_shared(store: Arc<S>) -> Self {
        Self {
            graph: Arc::new(TopicGraph::new(Arc::clone(&store))),
            store,
        }
    }
}

impl<S: TopicStore + 'static> Clone for ServiceState<S> {
    fn clone(&self) -> Self {
        Self {
            graph: Arc::clone(&self.graph),
            store: Arc::clone(&self.store),
        }
    }
}
