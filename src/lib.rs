//! # topic-graph
//!
//! Versioned topic hierarchies with current-version resolution.
//!
//! Topics are immutable version records. Editing a topic appends a new
//! record sharing the same logical id, and the parent/child hierarchy is
//! defined between logical topics rather than between records.
//!
//! ## Core Contract
//!
//! 1. Resolve any version id to the current version of its logical topic
//! 2. Create topics and append successor versions without rewriting history
//! 3. Assemble tree snapshots that show exactly one (the latest) version per logical topic
//! 4. Find hop-count shortest paths between topics across the hierarchy
//!
//! ## Architecture
//!
//! ```text
//! TopicLifecycle ─┐
//! TreeAssembler ──┼─▶ VersionResolver ─▶ TopicStore (Postgres or Memory)
//! PathFinder ─────┘
//! ```
//!
//! [`TopicGraph`] bundles all of them over one injected store.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod store;
pub mod error;
pub mod resolver;
pub mod lifecycle;
pub mod tree;
pub mod path;
pub mod graph;
pub mod canonical;

#[cfg(feature = "service")]
pub mod service;

// Re-exports
pub use types::{TopicId, LogicalId, TopicVersion, TopicTree, TopicPath};
pub use error::{TopicError, TopicResult};
pub use store::{TopicStore, TopicQuery, TopicFilter, VersionOrder, PoolStats, InMemoryTopicStore};
#[cfg(feature = "postgres")]
pub use store::PostgresTopicStore;
pub use resolver::VersionResolver;
pub use lifecycle::TopicLifecycle;
pub use tree::TreeAssembler;
pub use path::PathFinder;
pub use graph::TopicGraph;
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex};

// Service re-exports (when service feature is enabled)
#[cfg(feature = "service")]
pub use service::{create_router, ServiceConfig, ServiceState};

/// Schema version for serialized topic graph types.
/// Increment on breaking changes to any schema type.
pub const TOPIC_GRAPH_SCHEMA_VERSION: &str = "1.0.0";
