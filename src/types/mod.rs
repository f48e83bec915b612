//! Core types for the topic graph.

pub mod topic;
pub mod tree;
pub mod path;

pub use topic::{TopicId, LogicalId, TopicVersion};
pub use tree::{TopicTree, TreeIter};
pub use path::TopicPath;
