//! Accessors over the nested player snapshot
//!
//! `player:player/data` is the one untagged structure the SDK cares
//! about. The shape (observed on LSX II / LS50 Wireless II firmware):
//!
//! ```json
//! {
//!   "state": "playing",
//!   "status": { "duration": 215000 },
//!   "trackRoles": {
//!     "title": "...",
//!     "mediaData": { "metaData": { "artist": "...", "album": "..." } }
//!   }
//! }
//! ```

use serde_json::Value;

/// Playback state ("playing", "paused", "stopped")
pub fn state(data: &Value) -> Option<&str> {
    data.get("state").and_then(Value::as_str)
}

/// Track duration in milliseconds
pub fn duration_ms(data: &Value) -> Option<i64> {
    data.pointer("/status/duration").and_then(Value::as_i64)
}

pub fn track_title(data: &Value) -> Option<&str> {
    data.pointer("/trackRoles/title").and_then(Value::as_str)
}

pub fn track_artist(data: &Value) -> Option<&str> {
    data.pointer("/trackRoles/mediaData/metaData/artist")
        .and_then(Value::as_str)
}

pub fn track_album(data: &Value) -> Option<&str> {
    data.pointer("/trackRoles/mediaData/metaData/album")
        .and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot() -> Value {
        json!({
            "state": "playing",
            "status": { "duration": 215000 },
            "trackRoles": {
                "title": "Teardrop",
                "mediaData": { "metaData": { "artist": "Massive Attack", "album": "Mezzanine" } }
            }
        })
    }

    #[test]
    fn test_full_snapshot() {
        let data = snapshot();
        assert_eq!(state(&data), Some("playing"));
        assert_eq!(duration_ms(&data), Some(215000));
        assert_eq!(track_title(&data), Some("Teardrop"));
        assert_eq!(track_artist(&data), Some("Massive Attack"));
        assert_eq!(track_album(&data), Some("Mezzanine"));
    }

    #[test]
    fn test_missing_fields_yield_none() {
        let data = json!({"state":"stopped"});
        assert_eq!(state(&data), Some("stopped"));
        assert_eq!(duration_ms(&data), None);
        assert_eq!(track_title(&data), None);
        assert_eq!(track_artist(&data), None);
    }
}
