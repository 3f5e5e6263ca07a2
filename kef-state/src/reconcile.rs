//! The diff engine behind one polling round
//!
//! Takes the raw records a long-poll round returned, maps them, and
//! decides which represent genuine changes against the session's
//! last-known state. Repeated updates to one key within a round
//! coalesce to the latest value; play-position updates are withheld
//! from the result unless the caller opted in; a round that
//! re-baselines after staleness records new values without reporting
//! them. All session mutation happens in a single infallible commit at
//! the end, so nothing upstream of it can leave the session half
//! updated.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use kef_api::RawEvent;
use serde_json::Value;

use crate::change_set::ChangeSet;
use crate::key::SemanticKey;
use crate::mapper;
use crate::session::PollSession;

/// Map a batch of raw records and reconcile them against the session
///
/// Records that cannot be mapped are dropped with a diagnostic and do
/// not affect their neighbors. This is the one entry point both
/// connector surfaces call after their transport wait returns.
pub fn process(
    session: &mut PollSession,
    events: &[RawEvent],
    poll_song_status: bool,
) -> ChangeSet {
    let mut mapped = Vec::with_capacity(events.len());
    for event in events {
        match mapper::map(event) {
            Ok(pairs) => mapped.extend(pairs),
            Err(err) => tracing::warn!(%err, "dropping unmappable event"),
        }
    }
    reconcile(session, mapped, poll_song_status)
}

/// Reconcile mapped events against the session and commit
///
/// The algorithm, in order: coalesce per key (latest value wins, and
/// `Other` entries merge into one object), consult the staleness
/// tracker, stage every value that differs from the session's view,
/// then commit the staged values, the advanced tracker state, and the
/// round's bookkeeping in one pass. The returned set contains the
/// staged changes minus whatever the suppression rules withheld.
pub fn reconcile(
    session: &mut PollSession,
    mapped: Vec<(SemanticKey, Value)>,
    poll_song_status: bool,
) -> ChangeSet {
    let latest = coalesce(mapped);

    let song_status_seen = latest.contains_key(&SemanticKey::SongStatus);

    // Effective playback status for this round: what the round reported,
    // falling back to the last observation.
    let playing = latest
        .get(&SemanticKey::Status)
        .or_else(|| session.last_value(SemanticKey::Status))
        .and_then(Value::as_str)
        == Some("playing");

    let tracker = session
        .tracker()
        .advance(playing, song_status_seen, session.song_status_seen_prev);
    let rebaseline = tracker.is_rebaselining();
    if rebaseline {
        tracing::debug!("play position went stale; re-baselining without reporting");
    }

    let mut staged = Vec::new();
    let mut changes = ChangeSet::new();
    for (key, value) in latest {
        if session.last_value(key) == Some(&value) {
            continue;
        }
        let suppressed = (key == SemanticKey::SongStatus && !poll_song_status)
            || (rebaseline && matches!(key, SemanticKey::SongStatus | SemanticKey::SongInfo));
        if !suppressed {
            changes.insert(key, value.clone());
        }
        staged.push((key, value));
    }

    // Commit. Infallible from here down.
    for (key, value) in staged {
        session.last_values.insert(key, value);
    }
    session.tracker = tracker;
    session.song_status_seen_prev = song_status_seen;
    session.first_poll = false;

    changes
}

/// Collapse a round's events to one value per key, in arrival order
///
/// The latest value wins; `Other` entries merge so several unmapped
/// fields can coexist in one result.
fn coalesce(mapped: Vec<(SemanticKey, Value)>) -> BTreeMap<SemanticKey, Value> {
    let mut latest = BTreeMap::new();
    for (key, value) in mapped {
        if key == SemanticKey::Other {
            match latest.entry(SemanticKey::Other) {
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
                Entry::Occupied(mut slot) => {
                    if let (Value::Object(merged), Value::Object(new)) =
                        (slot.get_mut(), value)
                    {
                        merged.extend(new);
                    }
                }
            }
        } else {
            latest.insert(key, value);
        }
    }
    latest
}
