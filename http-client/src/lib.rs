//! Private HTTP client for KEF device communication
//!
//! This crate provides a minimal HTTP/JSON client specifically designed
//! for the control API exposed by KEF wireless speakers (getData /
//! setData / event-queue endpoints). Every operation is a single GET
//! with query parameters returning a JSON document; the event-queue
//! poll additionally carries a server-side wait budget, which this
//! client honors by widening the request timeout by a small grace
//! margin so the device always answers first.

mod error;

pub use error::TransportError;

use std::time::Duration;

use serde_json::Value;

/// Extra time allowed on top of a long-poll wait budget before the
/// request itself is considered failed. The device is expected to
/// answer (possibly with an empty list) once the budget elapses.
pub const POLL_GRACE: Duration = Duration::from_secs(5);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const READ_TIMEOUT: Duration = Duration::from_secs(10);

fn request_url(host: &str, endpoint: &str) -> String {
    format!("http://{}/{}", host, endpoint)
}

/// A minimal blocking HTTP client for KEF device communication
#[derive(Debug, Clone)]
pub struct HttpClient {
    agent: ureq::Agent,
}

impl HttpClient {
    /// Create a new client with default timeout configuration
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(CONNECT_TIMEOUT)
                .timeout_read(READ_TIMEOUT)
                .build(),
        }
    }

    /// Issue one GET request and return the parsed JSON body
    ///
    /// `wait` is the server-side wait budget for long-poll endpoints;
    /// when given, the whole request is allowed `wait + POLL_GRACE`
    /// before failing with [`TransportError::Network`]. Ordinary
    /// endpoints pass `None` and use the agent's default timeouts.
    pub fn request(
        &self,
        host: &str,
        endpoint: &str,
        params: &[(&str, String)],
        wait: Option<Duration>,
    ) -> Result<Value, TransportError> {
        let url = request_url(host, endpoint);
        let mut req = self.agent.get(&url);
        for (name, value) in params {
            req = req.query(name, value);
        }
        if let Some(wait) = wait {
            req = req.timeout(wait + POLL_GRACE);
        }

        tracing::trace!(%url, "sending device request");
        let response = req.call().map_err(|e| match e {
            ureq::Error::Status(code, _) => TransportError::Http(code),
            ureq::Error::Transport(t) => TransportError::Network(t.to_string()),
        })?;

        response
            .into_json::<Value>()
            .map_err(|e| TransportError::Parse(e.to_string()))
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// The suspending counterpart of [`HttpClient`]
///
/// Same request contract, but the caller's task yields for the duration
/// of the transport wait instead of blocking its thread.
#[derive(Debug, Clone)]
pub struct AsyncHttpClient {
    client: reqwest::Client,
}

impl AsyncHttpClient {
    /// Create a new client with default timeout configuration
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Issue one GET request and return the parsed JSON body
    ///
    /// Timeout semantics are identical to [`HttpClient::request`].
    pub async fn request(
        &self,
        host: &str,
        endpoint: &str,
        params: &[(&str, String)],
        wait: Option<Duration>,
    ) -> Result<Value, TransportError> {
        let url = request_url(host, endpoint);
        let timeout = wait.map(|w| w + POLL_GRACE).unwrap_or(READ_TIMEOUT);

        tracing::trace!(%url, "sending device request");
        let response = self
            .client
            .get(&url)
            .query(params)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Http(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| TransportError::Parse(e.to_string()))
    }
}

impl Default for AsyncHttpClient {
    fn default() -> Self {
        Self::new()
    }
}
