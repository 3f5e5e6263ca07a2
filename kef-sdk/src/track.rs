//! Track metadata as reported by the player snapshot

use kef_api::player_data;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Title, artist and album of the current track
///
/// Every field is optional; radio streams and external inputs often
/// report only a subset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SongInformation {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

impl SongInformation {
    /// Extract metadata from a raw player snapshot
    pub fn from_player_data(data: &Value) -> Self {
        Self {
            title: player_data::track_title(data).map(str::to_string),
            artist: player_data::track_artist(data).map(str::to_string),
            album: player_data::track_album(data).map(str::to_string),
        }
    }
}
