//! The result of one polling round

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::key::SemanticKey;

/// The changes observed in one polling round
///
/// Maps semantic keys to their new values. A key appears only if its
/// value genuinely differs from the last observation (subject to the
/// song-status suppression and re-baseline rules in the reconciler);
/// an empty set means the wait budget elapsed with nothing to report.
///
/// Backed by a `BTreeMap`, so iteration and serialization order is
/// deterministic — the blocking and suspending connectors produce
/// byte-identical output for identical device timelines.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ChangeSet {
    changes: BTreeMap<SemanticKey, Value>,
}

impl ChangeSet {
    /// Create an empty change-set
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: SemanticKey, value: Value) {
        self.changes.insert(key, value);
    }

    /// Get the new value for a key, if it changed this round
    pub fn get(&self, key: SemanticKey) -> Option<&Value> {
        self.changes.get(&key)
    }

    /// Whether a key changed this round
    pub fn contains(&self, key: SemanticKey) -> bool {
        self.changes.contains_key(&key)
    }

    /// Number of changed keys
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Whether nothing changed this round
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Iterate over changed keys and their new values in key order
    pub fn iter(&self) -> impl Iterator<Item = (SemanticKey, &Value)> {
        self.changes.iter().map(|(k, v)| (*k, v))
    }

    /// Consume into the underlying map
    pub fn into_map(self) -> BTreeMap<SemanticKey, Value> {
        self.changes
    }
}

impl IntoIterator for ChangeSet {
    type Item = (SemanticKey, Value);
    type IntoIter = std::collections::btree_map::IntoIter<SemanticKey, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_and_lookup() {
        let mut set = ChangeSet::new();
        assert!(set.is_empty());

        set.insert(SemanticKey::Volume, json!(30));
        assert_eq!(set.len(), 1);
        assert!(set.contains(SemanticKey::Volume));
        assert_eq!(set.get(SemanticKey::Volume), Some(&json!(30)));
        assert_eq!(set.get(SemanticKey::Mute), None);
    }

    #[test]
    fn test_serializes_with_semantic_key_names() {
        let mut set = ChangeSet::new();
        set.insert(SemanticKey::Volume, json!(30));
        set.insert(SemanticKey::Source, json!("wifi"));

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"source":"wifi","volume":30}"#);
    }

    #[test]
    fn test_iteration_order_is_stable() {
        let mut set = ChangeSet::new();
        set.insert(SemanticKey::Other, json!({"x": 1}));
        set.insert(SemanticKey::Source, json!("tv"));
        set.insert(SemanticKey::Volume, json!(10));

        let keys: Vec<_> = set.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![SemanticKey::Source, SemanticKey::Volume, SemanticKey::Other]
        );
    }
}
