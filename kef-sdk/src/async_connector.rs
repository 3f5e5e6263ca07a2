//! Suspending connector for one KEF speaker
//!
//! Mirrors [`KefConnector`](crate::KefConnector) method for method.
//! Both surfaces run the identical reconcile logic from `kef-state`;
//! the only difference is that this one suspends the calling task at
//! the transport wait instead of blocking its thread, so for any given
//! device timeline the two produce identical change-sets in identical
//! order.

use std::time::Duration;

use kef_api::{envelope, paths, AsyncKefClient};
use kef_state::ChangeSet;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::connector::{
    expect_bool, expect_int, expect_object, expect_str, PollState, DEFAULT_POLL_TIMEOUT,
};
use crate::error::{Result, SdkError};
use crate::track::SongInformation;

/// The suspending counterpart of [`KefConnector`](crate::KefConnector)
pub struct AsyncKefConnector {
    api: AsyncKefClient,
    poll: Mutex<PollState>,
    previous_volume: parking_lot::Mutex<Option<i64>>,
}

impl AsyncKefConnector {
    /// Create a connector for the speaker at `host` (IP or `ip:port`)
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            api: AsyncKefClient::new(host),
            poll: Mutex::new(PollState::new()),
            previous_volume: parking_lot::Mutex::new(None),
        }
    }

    pub fn host(&self) -> &str {
        self.api.host()
    }

    // ------------------------------------------------------------------
    // Long-poll change feed
    // ------------------------------------------------------------------

    /// Wait for device changes with the default budget
    pub async fn poll(&self) -> Result<ChangeSet> {
        self.poll_with(DEFAULT_POLL_TIMEOUT, false).await
    }

    /// Wait up to `timeout` for device changes
    ///
    /// Semantics are identical to
    /// [`KefConnector::poll_with`](crate::KefConnector::poll_with); the
    /// caller's task yields at the transport wait, which is the only
    /// suspension point. Cancelling the returned future commits
    /// nothing: reconciliation runs synchronously after the wait, so a
    /// dropped poll leaves the session exactly as it was.
    pub async fn poll_with(&self, timeout: Duration, poll_song_status: bool) -> Result<ChangeSet> {
        let mut state = self.poll.try_lock().map_err(|_| SdkError::PollInProgress)?;

        let queue_id = if state.needs_registration() {
            let id = self.api.modify_queue(paths::SUBSCRIBED).await?;
            tracing::debug!(%id, "registered device event queue");
            state.queue_id = Some(id.clone());
            id
        } else {
            state.queue_id.clone().ok_or_else(|| {
                SdkError::unexpected_value("pollQueue", "no registered event queue")
            })?
        };

        let events = match self.api.poll_queue(&queue_id, timeout).await {
            Ok(events) => events,
            Err(err) => {
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
    pub async fn volume(&self) -> Result<i64> {
        expect_int(self.api.get_data(paths::VOLUME).await?, paths::VOLUME)
    }

    pub async fn set_volume(&self, volume: i64) -> Result<()> {
        self.api
            .set_data(paths::VOLUME, &envelope("i32_", volume.into()))
            .await?;
        Ok(())
    }

    /// Active source: standby, wifi, bluetooth, tv, optic, coaxial or
    /// analog
    pub async fn source(&self) -> Result<String> {
        expect_str(
            self.api.get_data(paths::PHYSICAL_SOURCE).await?,
            paths::PHYSICAL_SOURCE,
        )
    }

    /// Switch source; a speaker in standby powers on
    pub async fn set_source(&self, source: &str) -> Result<()> {
        self.api
            .set_data(
                paths::PHYSICAL_SOURCE,
                &envelope("kefPhysicalSource", source.into()),
            )
            .await?;
        Ok(())
    }

    /// Power status: "standby" or "powerOn"
    pub async fn status(&self) -> Result<String> {
        expect_str(
            self.api.get_data(paths::SPEAKER_STATUS).await?,
            paths::SPEAKER_STATUS,
        )
    }

    pub async fn power_on(&self) -> Result<()> {
        self.api
            .set_data(
                paths::PHYSICAL_SOURCE,
                &envelope("kefPhysicalSource", "powerOn".into()),
            )
            .await?;
        Ok(())
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.set_source("standby").await
    }

    pub async fn is_muted(&self) -> Result<bool> {
        expect_bool(self.api.get_data(paths::MUTE).await?, paths::MUTE)
    }

    /// Mute by dropping the volume to zero, remembering the old value
    pub async fn mute(&self) -> Result<()> {
        let current = self.volume().await?;
        *self.previous_volume.lock() = Some(current);
        self.set_volume(0).await
    }

    /// Restore the volume observed by the last mute
    ///
    /// Does nothing if this connector never muted the speaker.
    pub async fn unmute(&self) -> Result<()> {
        let previous = *self.previous_volume.lock();
        match previous {
            Some(volume) => self.set_volume(volume).await,
            None => Ok(()),
        }
    }

    /// Friendly device name
    pub async fn speaker_name(&self) -> Result<String> {
        expect_str(
            self.api.get_data(paths::DEVICE_NAME).await?,
            paths::DEVICE_NAME,
        )
    }

    /// Primary MAC address
    pub async fn mac_address(&self) -> Result<String> {
        expect_str(
            self.api.get_data(paths::MAC_ADDRESS).await?,
            paths::MAC_ADDRESS,
        )
    }

    pub async fn is_playing(&self) -> Result<bool> {
        let data = self.player_data().await?;
        Ok(kef_api::player_data::state(&data) == Some("playing"))
    }

    /// Track duration in milliseconds; `None` when nothing is playing
    pub async fn song_length(&self) -> Result<Option<i64>> {
        let data = self.player_data().await?;
        if kef_api::player_data::state(&data) == Some("playing") {
            Ok(kef_api::player_data::duration_ms(&data))
        } else {
            Ok(None)
        }
    }

    /// Playback position in milliseconds
    pub async fn song_status(&self) -> Result<i64> {
        expect_int(self.api.get_data(paths::PLAY_TIME).await?, paths::PLAY_TIME)
    }

    /// Title, artist and album of the current track
    pub async fn get_song_information(&self) -> Result<SongInformation> {
        let data = self.player_data().await?;
        Ok(SongInformation::from_player_data(&data))
    }

    // ------------------------------------------------------------------
    // Transport control
    // ------------------------------------------------------------------

    pub async fn toggle_play_pause(&self) -> Result<()> {
        self.track_control("pause").await
    }

    pub async fn next_track(&self) -> Result<()> {
        self.track_control("next").await
    }

    pub async fn previous_track(&self) -> Result<()> {
        self.track_control("previous").await
    }

    async fn track_control(&self, command: &str) -> Result<()> {
        self.api
            .activate(paths::PLAYER_CONTROL, &json!({ "control": command }))
            .await?;
        Ok(())
    }

    async fn player_data(&self) -> Result<Value> {
        expect_object(
            self.api.get_data(paths::PLAYER_DATA).await?,
            paths::PLAYER_DATA,
        )
    }
}

impl std::fmt::Debug for AsyncKefConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncKefConnector")
            .field("host", &self.host())
            .finish()
    }
}
