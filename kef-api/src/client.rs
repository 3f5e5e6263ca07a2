//! Blocking client for KEF device operations

use std::time::Duration;

use http_client::HttpClient;
use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::events::{parse_poll_body, RawEvent};
use crate::query;
use crate::value::KefValue;

/// A blocking client for executing KEF operations against a device
///
/// Wraps the HTTP transport with the device's calling convention:
/// getData/setData for properties, activate for commands, and the
/// modifyQueue/pollQueue pair for the long-poll change feed. The
/// client holds no device state beyond the host address.
#[derive(Debug, Clone)]
pub struct KefClient {
    host: String,
    http: HttpClient,
}

impl KefClient {
    /// Create a client for the speaker at `host` (IP or `ip:port`)
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            http: HttpClient::new(),
        }
    }

    /// Create a client with a custom transport (for advanced use cases)
    pub fn with_http_client(host: impl Into<String>, http: HttpClient) -> Self {
        Self {
            host: host.into(),
            http,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Read one property value
    pub fn get_data(&self, path: &str) -> Result<KefValue> {
        let body = self
            .http
            .request(&self.host, query::GET_DATA, &query::get_data(path), None)?;
        let envelope = first_element(&body, path)?;
        Ok(KefValue::decode(envelope)?)
    }

    /// Write one property value (pre-built envelope)
    pub fn set_data(&self, path: &str, value: &Value) -> Result<()> {
        self.http
            .request(&self.host, query::SET_DATA, &query::set_data(path, value), None)?;
        Ok(())
    }

    /// Fire a command at an activation path
    pub fn activate(&self, path: &str, value: &Value) -> Result<()> {
        self.http
            .request(&self.host, query::SET_DATA, &query::activate(path, value), None)?;
        Ok(())
    }

    /// Register an event queue for the given paths
    ///
    /// Returns the device-assigned queue id used by [`poll_queue`].
    ///
    /// [`poll_queue`]: KefClient::poll_queue
    pub fn modify_queue(&self, subscribe: &[&str]) -> Result<String> {
        let body = self.http.request(
            &self.host,
            query::MODIFY_QUEUE,
            &query::modify_queue(subscribe),
            None,
        )?;
        queue_id_from(&body)
    }

    /// Wait up to `timeout` for queued change records
    ///
    /// This is the long-poll round: the device holds the request until
    /// something changes or the budget elapses, then answers with a
    /// (possibly empty) list of records.
    pub fn poll_queue(&self, queue_id: &str, timeout: Duration) -> Result<Vec<RawEvent>> {
        let body = self.http.request(
            &self.host,
            query::POLL_QUEUE,
            &query::poll_queue(queue_id, timeout),
            Some(timeout),
        )?;
        parse_poll_body(&body)
    }
}

pub(crate) fn first_element<'a>(body: &'a Value, path: &str) -> Result<&'a Value> {
    body.as_array().and_then(|rows| rows.first()).ok_or_else(|| {
        ApiError::UnexpectedResponse(format!("empty or non-array getData response for {path}"))
    })
}

pub(crate) fn queue_id_from(body: &Value) -> Result<String> {
    body.as_str().map(str::to_string).ok_or_else(|| {
        ApiError::UnexpectedResponse(format!("modifyQueue did not return a queue id: {body}"))
    })
}
