//! Translation from raw device events to semantic keys
//!
//! The device reports changes against its own path strings with tagged
//! value envelopes; this module turns one such record into the
//! canonical key/value pairs the diff engine works with. The path
//! table is static; a path it does not know lands in the `Other`
//! bucket keyed by the raw sub-key rather than failing.

use kef_api::paths;
use kef_api::player_data;
use kef_api::{EnvelopeError, KefValue, RawEvent};
use serde_json::{json, Value};
use thiserror::Error;

use crate::key::SemanticKey;

/// A raw event whose value envelope could not be decoded
///
/// Mapping failures are per-event and non-fatal; the caller logs and
/// drops the event without disturbing the rest of the batch.
#[derive(Debug, Error)]
#[error("event at {path} cannot be mapped: {source}")]
pub struct MapError {
    pub path: String,
    #[source]
    pub source: EnvelopeError,
}

/// Map one raw event into canonical key/value pairs
///
/// Scalar paths yield exactly one pair. The nested player snapshot
/// fans out into up to three: the track metadata (`song_info`), the
/// playback state (`status`), and the duration (`song_length`) — all
/// read from fields of the one reported record, never invented.
/// Unknown paths yield a single `Other` entry carrying the raw
/// sub-key. Value coercion strictly follows the envelope's type tag.
pub fn map(event: &RawEvent) -> Result<Vec<(SemanticKey, Value)>, MapError> {
    let value = KefValue::decode(&event.item_value).map_err(|source| MapError {
        path: event.path.clone(),
        source,
    })?;

    match lookup(&event.path) {
        Some(SemanticKey::SongInfo) => Ok(fan_out_player_data(value.into_json())),
        Some(key) => Ok(vec![(key, value.into_json())]),
        None => {
            let sub_key = path_tail(&event.path);
            Ok(vec![(
                SemanticKey::Other,
                json!({ sub_key: value.into_json() }),
            )])
        }
    }
}

/// The static path table
fn lookup(path: &str) -> Option<SemanticKey> {
    match path {
        paths::PHYSICAL_SOURCE => Some(SemanticKey::Source),
        paths::VOLUME => Some(SemanticKey::Volume),
        paths::PLAYER_DATA => Some(SemanticKey::SongInfo),
        paths::PLAY_TIME => Some(SemanticKey::SongStatus),
        paths::MUTE => Some(SemanticKey::Mute),
        paths::SPEAKER_STATUS => Some(SemanticKey::SpeakerStatus),
        paths::DEVICE_NAME => Some(SemanticKey::DeviceName),
        _ => None,
    }
}

fn fan_out_player_data(data: Value) -> Vec<(SemanticKey, Value)> {
    let mut out = Vec::with_capacity(3);
    out.push((
        SemanticKey::SongInfo,
        json!({
            "title": player_data::track_title(&data),
            "artist": player_data::track_artist(&data),
            "album": player_data::track_album(&data),
        }),
    ));
    if let Some(state) = player_data::state(&data) {
        out.push((SemanticKey::Status, Value::from(state)));
    }
    if let Some(duration) = player_data::duration_ms(&data) {
        out.push((SemanticKey::SongLength, Value::from(duration)));
    }
    out
}

/// Last segment of a device path, used as the `Other` sub-key
fn path_tail(path: &str) -> &str {
    let tail = path.rsplit(['/', ':']).next().unwrap_or(path);
    if tail.is_empty() {
        path
    } else {
        tail
    }
}
