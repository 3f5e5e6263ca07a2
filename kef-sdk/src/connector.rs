//! Blocking connector for one KEF speaker

use std::time::Duration;

use kef_api::{envelope, paths, KefClient, KefValue};
use kef_state::{ChangeSet, PollSession};
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::error::{Result, SdkError};
use crate::track::SongInformation;

/// Default server-side wait budget for [`KefConnector::poll`]
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(10);

/// State owned exclusively by one connector's poll path
///
/// The session and the device-assigned queue id live behind one lock,
/// taken non-blockingly: two overlapping polls on the same connector
/// are a usage error and fail fast instead of interleaving.
pub(crate) struct PollState {
    pub(crate) session: PollSession,
    pub(crate) queue_id: Option<String>,
}

impl PollState {
    pub(crate) fn new() -> Self {
        Self {
            session: PollSession::new(),
            queue_id: None,
        }
    }

    /// Whether this poll must (re-)register the device event queue
    pub(crate) fn needs_registration(&self) -> bool {
        self.queue_id.is_none() || self.session.is_first_poll()
    }
}

/// A blocking connector for one KEF speaker
///
/// Control operations are one request each; [`poll`] is the long-poll
/// change feed: it blocks the calling thread until the device reports
/// a change or the wait budget elapses, and returns only what genuinely
/// changed since the previous call. The suspending twin is
/// [`AsyncKefConnector`](crate::AsyncKefConnector).
///
/// [`poll`]: KefConnector::poll
pub struct KefConnector {
    api: KefClient,
    poll: Mutex<PollState>,
    previous_volume: Mutex<Option<i64>>,
}

impl KefConnector {
    /// Create a connector for the speaker at `host` (IP or `ip:port`)
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            api: KefClient::new(host),
            poll: Mutex::new(PollState::new()),
            previous_volume: Mutex::new(None),
        }
    }

    pub fn host(&self) -> &str {
        self.api.host()
    }

    // ------------------------------------------------------------------
    // Long-poll change feed
    // ------------------------------------------------------------------

    /// Wait for device changes with the default budget
    ///
    /// Equivalent to `poll_with(DEFAULT_POLL_TIMEOUT, false)`.
    pub fn poll(&self) -> Result<ChangeSet> {
        self.poll_with(DEFAULT_POLL_TIMEOUT, false)
    }

    /// Wait up to `timeout` for device changes
    ///
    /// Returns the set of properties that changed since the last poll,
    /// possibly empty if the budget elapsed quietly. Play-position
    /// updates are recorded but only reported when `poll_song_status`
    /// is true, so a playing track does not drown out other signals.
    ///
    /// The first call registers the device event queue; a queue the
    /// device has dropped is re-registered on the next call. Errors
    /// surface unmodified and never leave the session half-updated.
    /// A second `poll` while one is in flight fails with
    /// [`SdkError::PollInProgress`].
    pub fn poll_with(&self, timeout: Duration, poll_song_status: bool) -> Result<ChangeSet> {
        let mut state = self.poll.try_lock().ok_or(SdkError::PollInProgress)?;

        let queue_id = if state.needs_registration() {
            let id = self.api.modify_queue(paths::SUBSCRIBED)?;
            tracing::debug!(%id, "registered device event queue");
            state.queue_id = Some(id.clone());
            id
        } else {
            // needs_registration() guarantees the id is present here.
            state.queue_id.clone().ok_or_else(|| {
                SdkError::unexpected_value("pollQueue", "no registered event queue")
            })?
        };

        let events = match self.api.poll_queue(&queue_id, timeout) {
            Ok(events) => events,
            Err(err) => {
                // The device may have expired the queue; re-register
                // on the next call.
                state.queue_id = None;
                return Err(err.into());
            }
        };

        Ok(kef_state::process(&mut state.session, &events, poll_song_status))
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    /// Master volume (0-100)
    pub fn volume(&self) -> Result<i64> {
        expect_int(self.api.get_data(paths::VOLUME)?, paths::VOLUME)
    }

    pub fn set_volume(&self, volume: i64) -> Result<()> {
        self.api
            .set_data(paths::VOLUME, &envelope("i32_", volume.into()))?;
        Ok(())
    }

    /// Active source: standby, wifi, bluetooth, tv, optic, coaxial or
    /// analog
    pub fn source(&self) -> Result<String> {
        expect_str(
            self.api.get_data(paths::PHYSICAL_SOURCE)?,
            paths::PHYSICAL_SOURCE,
        )
    }

    /// Switch source; a speaker in standby powers on
    pub fn set_source(&self, source: &str) -> Result<()> {
        self.api.set_data(
            paths::PHYSICAL_SOURCE,
            &envelope("kefPhysicalSource", source.into()),
        )?;
        Ok(())
    }

    /// Power status: "standby" or "powerOn"
    pub fn status(&self) -> Result<String> {
        expect_str(
            self.api.get_data(paths::SPEAKER_STATUS)?,
            paths::SPEAKER_STATUS,
        )
    }

    pub fn power_on(&self) -> Result<()> {
        self.api.set_data(
            paths::PHYSICAL_SOURCE,
            &envelope("kefPhysicalSource", "powerOn".into()),
        )?;
        Ok(())
    }

    pub fn shutdown(&self) -> Result<()> {
        self.set_source("standby")
    }

    pub fn is_muted(&self) -> Result<bool> {
        expect_bool(self.api.get_data(paths::MUTE)?, paths::MUTE)
    }

    /// Mute by dropping the volume to zero, remembering the old value
    pub fn mute(&self) -> Result<()> {
        let current = self.volume()?;
        *self.previous_volume.lock() = Some(current);
        self.set_volume(0)
    }

    /// Restore the volume observed by the last [`mute`](KefConnector::mute)
    ///
    /// Does nothing if this connector never muted the speaker.
    pub fn unmute(&self) -> Result<()> {
        let previous = *self.previous_volume.lock();
        match previous {
            Some(volume) => self.set_volume(volume),
            None => Ok(()),
        }
    }

    /// Friendly device name
    pub fn speaker_name(&self) -> Result<String> {
        expect_str(self.api.get_data(paths::DEVICE_NAME)?, paths::DEVICE_NAME)
    }

    /// Primary MAC address
    pub fn mac_address(&self) -> Result<String> {
        expect_str(self.api.get_data(paths::MAC_ADDRESS)?, paths::MAC_ADDRESS)
    }

    pub fn is_playing(&self) -> Result<bool> {
        let data = self.player_data()?;
        Ok(kef_api::player_data::state(&data) == Some("playing"))
    }

    /// Track duration in milliseconds; `None` when nothing is playing
    pub fn song_length(&self) -> Result<Option<i64>> {
        let data = self.player_data()?;
        if kef_api::player_data::state(&data) == Some("playing") {
            Ok(kef_api::player_data::duration_ms(&data))
        } else {
            Ok(None)
        }
    }

    /// Playback position in milliseconds
    pub fn song_status(&self) -> Result<i64> {
        expect_int(self.api.get_data(paths::PLAY_TIME)?, paths::PLAY_TIME)
    }

    /// Title, artist and album of the current track
    pub fn get_song_information(&self) -> Result<SongInformation> {
        let data = self.player_data()?;
        Ok(SongInformation::from_player_data(&data))
    }

    // ------------------------------------------------------------------
    // Transport control
    // ------------------------------------------------------------------

    pub fn toggle_play_pause(&self) -> Result<()> {
        self.track_control("pause")
    }

    pub fn next_track(&self) -> Result<()> {
        self.track_control("next")
    }

    pub fn previous_track(&self) -> Result<()> {
        self.track_control("previous")
    }

    fn track_control(&self, command: &str) -> Result<()> {
        self.api
            .activate(paths::PLAYER_CONTROL, &json!({ "control": command }))?;
        Ok(())
    }

    fn player_data(&self) -> Result<Value> {
        expect_object(self.api.get_data(paths::PLAYER_DATA)?, paths::PLAYER_DATA)
    }
}

impl std::fmt::Debug for KefConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KefConnector")
            .field("host", &self.host())
            .finish()
    }
}

pub(crate) fn expect_int(value: KefValue, path: &str) -> Result<i64> {
    value
        .as_int()
        .ok_or_else(|| SdkError::unexpected_value(path, format!("expected an integer, got {value:?}")))
}

pub(crate) fn expect_bool(value: KefValue, path: &str) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| SdkError::unexpected_value(path, format!("expected a boolean, got {value:?}")))
}

pub(crate) fn expect_str(value: KefValue, path: &str) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| SdkError::unexpected_value(path, format!("expected a string, got {value:?}")))
}

pub(crate) fn expect_object(value: KefValue, path: &str) -> Result<Value> {
    match value {
        KefValue::Object(data) => Ok(data),
        other => Err(SdkError::unexpected_value(
            path,
            format!("expected a nested structure, got {other:?}"),
        )),
    }
}
