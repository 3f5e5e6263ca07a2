//! # kef-api - Typed KEF Speaker Protocol
//!
//! Typed operations for the HTTP/JSON control protocol spoken by KEF
//! wireless speakers (LSX II, LS50 Wireless II, LS60). Every property
//! on the device is addressed by a path string and travels as a tagged
//! value envelope; change notification works through a server-side
//! event queue that the client registers once and then long-polls.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use kef_api::{paths, KefClient};
//!
//! fn main() -> Result<(), kef_api::ApiError> {
//!     let client = KefClient::new("192.168.1.42");
//!
//!     // Read a property
//!     let volume = client.get_data(paths::VOLUME)?;
//!     println!("volume envelope: {:?}", volume);
//!
//!     // Register the event queue, then long-poll it
//!     let queue_id = client.modify_queue(paths::SUBSCRIBED)?;
//!     let events = client.poll_queue(&queue_id, Duration::from_secs(10))?;
//!     for event in events {
//!         println!("{} changed", event.path);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! KefClient / AsyncKefClient (operations)
//!     ↓
//! query (shared URL + parameter construction)
//!     ↓
//! http-client (one GET per operation)
//! ```
//!
//! The blocking and suspending clients are generated from the same
//! request construction, so they speak an identical wire protocol and
//! differ only in how the caller waits.

// Main exports
pub use async_client::AsyncKefClient;
pub use client::KefClient;
pub use error::{ApiError, Result};
pub use events::RawEvent;
pub use value::{envelope, EnvelopeError, KefValue};

// Internal modules
mod async_client;
mod client;
mod error;
mod events;
pub mod paths;
pub mod player_data;
mod query;
mod value;
