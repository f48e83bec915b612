//! Canonical serialization for snapshot fingerprints.
//!
//! ## Determinism Guarantees
//!
//! - Struct fields serialize in declaration order
//! - Vectors serialize in index order
//! - No HashMap in hashed data: use BTreeMap for maps
//! - Timestamps serialize as RFC 3339 strings

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes for hashing.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    // Only string-keyed, derive-serialized types reach this; serde_json cannot fail on them.
    serde_json::to_vec(value).expect("Canonical serialization failed")
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    xxh64(&to_canonical_bytes(value), 0)
}

/// Compute canonical hash and return as hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_determinism() {
        let mut versions = BTreeMap::new();
        versions.insert("intro", 3u32);
        versions.insert("basics", 1u32);

        assert_eq!(canonical_hash(&versions), canonical_hash(&versions.clone()));
        assert_eq!(canonical_hash_hex(&versions).len(), 16);
    }

    #[test]
    fn test_field_change_changes_hash() {
        assert_ne!(canonical_hash(&("topic", 1u32)), canonical_hash(&("topic", 2u32)));
    }
}
