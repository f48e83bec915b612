//! Topic version records and their identifiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use std::fmt;
use std::str::FromStr;

/// Identifier of one specific version record.
///
/// Wraps a UUID and implements `Ord` for deterministic ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicId(Uuid);

impl TopicId {
    /// Create a new TopicId from a UUID.
    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Allocate a fresh random TopicId.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for TopicId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for TopicId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Identifier shared by every version of the same logical topic.
///
/// Hierarchy membership is expressed in terms of `LogicalId`s, never
/// in terms of individual version records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicalId(Uuid);

impl LogicalId {
    /// Create a new LogicalId from a UUID.
    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Allocate a fresh random LogicalId.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for LogicalId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for LogicalId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// One immutable version record of a logical topic.
///
/// Records are never mutated once persisted. Editing a topic appends a
/// successor record (see [`TopicVersion::successor`]) with a fresh `id`
/// and `version + 1`; `logical_id` and `parent_logical_id` carry over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicVersion {
    /// Unique identifier of this record.
    pub id: TopicId,
    /// Identity shared by all versions of the topic.
    pub logical_id: LogicalId,
    /// Logical topic this one is nested under, fixed at version 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_logical_id: Option<LogicalId>,
    /// Version number, starting at 1 and gapless per logical topic.
    pub version: u32,
    /// Topic name.
    pub name: String,
    /// Topic body.
    pub content: String,
    /// Creation time of this record.
    pub created_at: DateTime<Utc>,
    /// Time this record was stamped by its last edit.
    pub updated_at: DateTime<Utc>,
}

impl TopicVersion {
    /// Build version 1 of a brand-new logical topic.
    pub fn first(
        name: impl Into<String>,
        content: impl Into<String>,
        parent_logical_id: Option<LogicalId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TopicId::generate(),
            logical_id: LogicalId::generate(),
            parent_logical_id,
            version: 1,
            name: name.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Build the record that supersedes `self`.
    ///
    /// The hierarchy position never changes across versions.
    pub fn successor(&self, name: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: TopicId::generate(),
            logical_id: self.logical_id,
            parent_logical_id: self.parent_logical_id,
            version: self.version + 1,
            name: name.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this topic sits at the top of a hierarchy.
    pub fn is_root(&self) -> bool {
        self.parent_logical_id.is_none()
    }

    /// Whether `other` is a version of the same logical topic.
    pub fn same_topic(&self, other: &TopicVersion) -> bool {
        self.logical_id == other.logical_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_version_defaults() {
        let topic = TopicVersion::first("Rust", "Ownership and borrowing", None);

        assert_eq!(topic.version, 1);
        assert!(topic.is_root());
        assert_eq!(topic.created_at, topic.updated_at);
    }

    #[test]
    fn test_successor_carries_identity() {
        let parent = LogicalId::generate();
        let v1 = TopicVersion::first("Traits", "draft", Some(parent));
        let v2 = v1.successor("Traits", "final");

        assert_ne!(v1.id, v2.id);
        assert_eq!(v2.logical_id, v1.logical_id);
        assert_eq!(v2.parent_logical_id, Some(parent));
        assert_eq!(v2.version, 2);
        assert_eq!(v2.content, "final");
        assert!(v2.same_topic(&v1));
    }

    #[test]
    fn test_topic_id_round_trip_display() {
        let id = TopicId::new(Uuid::from_u128(42));
        let parsed: TopicId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-uuid".parse::<TopicId>().is_err());
        assert!("not-a-uuid".parse::<LogicalId>().is_err());
    }

    #[test]
    fn test_serializes_camel_case() {
        let topic = TopicVersion::first("Name", "Body", None);
        let json = serde_json::to_value(&topic).unwrap();

        assert!(json.get("logicalId").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("parentLogicalId").is_none());
    }
}
