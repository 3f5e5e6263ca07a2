//! Canonical property names observable through `poll()`
//!
//! The device reports changes against opaque path strings; callers see
//! this closed set of semantic keys instead. `Other` is the catch-all
//! for device-specific fields the SDK does not model, carrying the raw
//! sub-key inside its value.

use serde::{Deserialize, Serialize};

/// A canonical, caller-facing property name
///
/// The set is fixed; a `ChangeSet` never contains keys outside it.
/// Ordering follows the declaration order, which gives `ChangeSet`
/// iteration a stable, deterministic order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticKey {
    /// Active physical source (wifi, bluetooth, tv, optic, coaxial,
    /// analog, or standby)
    Source,
    /// Master volume, 0-100
    Volume,
    /// Playback state (playing, paused, stopped)
    Status,
    /// Track metadata: title, artist, album
    SongInfo,
    /// Track duration in milliseconds
    SongLength,
    /// Playback position in milliseconds
    SongStatus,
    /// Mute flag
    Mute,
    /// Power status (standby or powerOn)
    SpeakerStatus,
    /// Friendly device name
    DeviceName,
    /// Unmapped device-specific fields, keyed by their raw sub-key
    Other,
}

impl SemanticKey {
    /// The caller-facing name of this key
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticKey::Source => "source",
            SemanticKey::Volume => "volume",
            SemanticKey::Status => "status",
            SemanticKey::SongInfo => "song_info",
            SemanticKey::SongLength => "song_length",
            SemanticKey::SongStatus => "song_status",
            SemanticKey::Mute => "mute",
            SemanticKey::SpeakerStatus => "speaker_status",
            SemanticKey::DeviceName => "device_name",
            SemanticKey::Other => "other",
        }
    }
}

impl std::fmt::Display for SemanticKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_snake_case() {
        let json = serde_json::to_string(&SemanticKey::SongStatus).unwrap();
        assert_eq!(json, r#""song_status""#);
        assert_eq!(SemanticKey::SongStatus.as_str(), "song_status");
    }

    #[test]
    fn test_round_trips_through_serde() {
        for key in [
            SemanticKey::Source,
            SemanticKey::Volume,
            SemanticKey::SpeakerStatus,
            SemanticKey::Other,
        ] {
            let json = serde_json::to_string(&key).unwrap();
            let back: SemanticKey = serde_json::from_str(&json).unwrap();
            assert_eq!(back, key);
        }
    }
}
