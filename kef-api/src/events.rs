//! Raw change records from the device event queue

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// One atomic change notification reported by the device
///
/// The `path` identifies what changed; `item_value` is the raw value
/// envelope (or nested structure) and is decoded downstream. Records
/// are deliberately kept loose here — interpretation belongs to the
/// state layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    /// Opaque device path of the changed item
    pub path: String,
    /// Kind of queue item, as reported ("update" in practice)
    #[serde(rename = "itemType", default)]
    pub item_type: Option<String>,
    /// Raw value payload
    #[serde(rename = "itemValue", default)]
    pub item_value: Value,
}

impl RawEvent {
    /// Build an update record, mainly for tests and fixtures
    pub fn new(path: impl Into<String>, item_value: Value) -> Self {
        Self {
            path: path.into(),
            item_type: Some("update".to_string()),
            item_value,
        }
    }
}

/// Parse a pollQueue response body into events
///
/// The body must be a JSON array; anything else fails the whole poll.
/// Individual rows that do not deserialize are dropped with a
/// diagnostic and do not affect their neighbors.
pub(crate) fn parse_poll_body(body: &Value) -> Result<Vec<RawEvent>, ApiError> {
    let rows = body.as_array().ok_or_else(|| {
        ApiError::UnexpectedResponse(format!("pollQueue response is not an array: {body}"))
    })?;

    let mut events = Vec::with_capacity(rows.len());
    for row in rows {
        match serde_json::from_value::<RawEvent>(row.clone()) {
            Ok(event) => events.push(event),
            Err(err) => tracing::warn!(%err, %row, "dropping malformed event record"),
        }
    }
    Ok(events)
}
