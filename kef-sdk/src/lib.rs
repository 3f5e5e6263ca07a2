//! # KEF SDK - Control and State Tracking for KEF Speakers
//!
//! Drives KEF wireless speakers (LSX II, LS50 Wireless II, LS60) over
//! their HTTP/JSON control API. Reads and writes every modeled
//! property, and tracks state changes through the device's long-poll
//! event queue instead of re-fetching:
//!
//! ```rust,no_run
//! use kef_sdk::{KefConnector, SemanticKey};
//!
//! fn main() -> Result<(), kef_sdk::SdkError> {
//!     let speaker = KefConnector::new("192.168.1.42");
//!
//!     speaker.set_source("wifi")?;
//!     speaker.set_volume(30)?;
//!
//!     loop {
//!         // Blocks until the device reports a change or 10s elapse.
//!         let changes = speaker.poll()?;
//!         if let Some(volume) = changes.get(SemanticKey::Volume) {
//!             println!("volume is now {volume}");
//!         }
//!     }
//! }
//! ```
//!
//! ## Two call surfaces, one algorithm
//!
//! Every operation exists on the blocking [`KefConnector`] and the
//! suspending [`AsyncKefConnector`]. Both feed the same
//! change-detection core (`kef-state`), so a caller switching between
//! them observes identical change-sets for identical device behavior —
//! only the waiting mechanics differ. On either surface, `poll` calls
//! on one connector are strictly sequential; an overlapping call fails
//! fast with [`SdkError::PollInProgress`].
//!
//! ## Architecture
//!
//! ```text
//! kef-sdk (connectors, profiles, logging)
//!     ↓
//! kef-state (mapper, diff engine, staleness tracker)
//!     ↓
//! kef-api (typed protocol: getData/setData/event queue)
//!     ↓
//! http-client (one GET per operation)
//! ```

// Main exports
pub use async_connector::AsyncKefConnector;
pub use connector::{KefConnector, DEFAULT_POLL_TIMEOUT};
pub use error::SdkError;
pub use profile::{ProfileError, ProfileInfo, ProfileStore};
pub use track::SongInformation;

// Re-export the types callers see in poll results
pub use kef_state::{ChangeSet, SemanticKey};

// Internal modules
mod async_connector;
mod connector;
mod error;
pub mod logging;
mod profile;
mod track;
