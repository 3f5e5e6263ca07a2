//! Well-known device paths
//!
//! The speaker addresses every readable or writable property by a
//! path string. These are the paths the SDK works with; everything
//! else the device reports travels through the `other` bucket.

/// Active physical source; also carries the power state ("standby" /
/// "powerOn" ride on this path).
pub const PHYSICAL_SOURCE: &str = "settings:/kef/play/physicalSource";

/// Master volume, 0-100 as a signed 32-bit envelope.
pub const VOLUME: &str = "player:volume";

/// Nested player snapshot: playback state, track metadata, duration.
pub const PLAYER_DATA: &str = "player:player/data";

/// Playback position in milliseconds. Updates roughly once per second
/// while something is playing.
pub const PLAY_TIME: &str = "player:player/data/playTime";

/// Mute flag.
pub const MUTE: &str = "settings:/mediaPlayer/mute";

/// Power status of the speaker ("standby" or "powerOn").
pub const SPEAKER_STATUS: &str = "settings:/kef/host/speakerStatus";

/// Friendly device name.
pub const DEVICE_NAME: &str = "settings:/deviceName";

/// Track control commands (play/pause/next/previous) are activated here.
pub const PLAYER_CONTROL: &str = "player:player/control";

/// Primary MAC address of the speaker.
pub const MAC_ADDRESS: &str = "settings:/system/primaryMacAddress";

/// Paths registered on the device event queue for change notification.
pub const SUBSCRIBED: &[&str] = &[
    PHYSICAL_SOURCE,
    VOLUME,
    PLAYER_DATA,
    PLAY_TIME,
    MUTE,
    SPEAKER_STATUS,
    DEVICE_NAME,
];
