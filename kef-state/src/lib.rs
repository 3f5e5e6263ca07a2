//! # kef-state - Long-Poll Change Detection
//!
//! The stateful core behind `poll()` on both connector surfaces.
//! Given the raw records one long-poll round returned, it produces the
//! set of properties that genuinely changed since the last round:
//!
//! ```rust
//! use kef_api::RawEvent;
//! use kef_state::{process, PollSession, SemanticKey};
//! use serde_json::json;
//!
//! let mut session = PollSession::new();
//!
//! // A round reported the volume three times; only the latest counts.
//! let events = vec![
//!     RawEvent::new("player:volume", json!({"type":"i32_","i32_":10})),
//!     RawEvent::new("player:volume", json!({"type":"i32_","i32_":30})),
//! ];
//! let changes = process(&mut session, &events, false);
//! assert_eq!(changes.get(SemanticKey::Volume), Some(&json!(30)));
//!
//! // Nothing changed since? Nothing reported.
//! let changes = process(&mut session, &events, false);
//! assert!(changes.is_empty());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! raw records (kef-api)
//!     ↓
//! mapper      — device path → SemanticKey, envelope → plain value
//!     ↓
//! reconcile   — coalesce, diff against PollSession, suppress
//!     ↓           (consults the staleness tracker)
//! ChangeSet   — deterministic, possibly empty
//! ```
//!
//! Everything here is pure computation over a [`PollSession`] owned by
//! the calling connector; no I/O, no suspension points, no locking.
//! Session mutation is confined to a single commit pass inside
//! [`reconcile`], which is what lets a failed or cancelled poll leave
//! the session exactly as it was.

// Main exports
pub use change_set::ChangeSet;
pub use key::SemanticKey;
pub use mapper::{map, MapError};
pub use reconcile::{process, reconcile};
pub use session::PollSession;
pub use tracker::TrackerState;

// Internal modules
mod change_set;
mod key;
mod mapper;
mod reconcile;
mod session;
mod tracker;
