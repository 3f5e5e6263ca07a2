//! Per-connector polling state

use std::collections::BTreeMap;

use serde_json::Value;

use crate::key::SemanticKey;
use crate::tracker::TrackerState;

/// The persistent record behind one connector's `poll()` calls
///
/// Holds the last observed value per semantic key, the staleness
/// tracker, and whether this session has polled yet. Created once per
/// connector and mutated solely inside its poll path; it always
/// reflects the most recent observation for every key, including keys
/// a round chose not to report.
#[derive(Debug, Clone)]
pub struct PollSession {
    pub(crate) last_values: BTreeMap<SemanticKey, Value>,
    pub(crate) tracker: TrackerState,
    pub(crate) song_status_seen_prev: bool,
    pub(crate) first_poll: bool,
}

impl PollSession {
    /// Create a fresh session with no observations
    pub fn new() -> Self {
        Self {
            last_values: BTreeMap::new(),
            tracker: TrackerState::Tracking,
            // A fresh session has no history to be stale against.
            song_status_seen_prev: true,
            first_poll: true,
        }
    }

    /// The last observed value for a key, if any round reported one
    pub fn last_value(&self, key: SemanticKey) -> Option<&Value> {
        self.last_values.get(&key)
    }

    /// Current state of the staleness tracker
    pub fn tracker(&self) -> TrackerState {
        self.tracker
    }

    /// Whether no reconciliation has committed on this session yet
    pub fn is_first_poll(&self) -> bool {
        self.first_poll
    }
}

impl Default for PollSession {
    fn default() -> Self {
        Self::new()
    }
}
