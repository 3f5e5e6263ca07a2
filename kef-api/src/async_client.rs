//! Suspending client for KEF device operations
//!
//! Mirrors [`KefClient`](crate::KefClient) operation for operation; the
//! request construction is shared, so both surfaces speak an identical
//! wire protocol and differ only in how the caller waits.

use std::time::Duration;

use http_client::AsyncHttpClient;
use serde_json::Value;

use crate::client::{first_element, queue_id_from};
use crate::error::Result;
use crate::events::{parse_poll_body, RawEvent};
use crate::query;
use crate::value::KefValue;

/// The suspending counterpart of [`KefClient`](crate::KefClient)
#[derive(Debug, Clone)]
pub struct AsyncKefClient {
    host: String,
    http: AsyncHttpClient,
}

impl AsyncKefClient {
    /// Create a client for the speaker at `host` (IP or `ip:port`)
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            http: AsyncHttpClient::new(),
        }
    }

    /// Create a client with a custom transport (for advanced use cases)
    pub fn with_http_client(host: impl Into<String>, http: AsyncHttpClient) -> Self {
        Self {
            host: host.into(),
            http,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Read one property value
    pub async fn get_data(&self, path: &str) -> Result<KefValue> {
        let body = self
            .http
            .request(&self.host, query::GET_DATA, &query::get_data(path), None)
            .await?;
        let envelope = first_element(&body, path)?;
        Ok(KefValue::decode(envelope)?)
    }

    /// Write one property value (pre-built envelope)
    pub async fn set_data(&self, path: &str, value: &Value) -> Result<()> {
        self.http
            .request(&self.host, query::SET_DATA, &query::set_data(path, value), None)
            .await?;
        Ok(())
    }

    /// Fire a command at an activation path
    pub async fn activate(&self, path: &str, value: &Value) -> Result<()> {
        self.http
            .request(&self.host, query::SET_DATA, &query::activate(path, value), None)
            .await?;
        Ok(())
    }

    /// Register an event queue for the given paths
    pub async fn modify_queue(&self, subscribe: &[&str]) -> Result<String> {
        let body = self
            .http
            .request(
                &self.host,
                query::MODIFY_QUEUE,
                &query::modify_queue(subscribe),
                None,
            )
            .await?;
        queue_id_from(&body)
    }

    /// Wait up to `timeout` for queued change records
    ///
    /// The caller's task is suspended for the duration of the transport
    /// wait; this is the only suspension point in the polling core.
    pub async fn poll_queue(&self, queue_id: &str, timeout: Duration) -> Result<Vec<RawEvent>> {
        let body = self
            .http
            .request(
                &self.host,
                query::POLL_QUEUE,
                &query::poll_queue(queue_id, timeout),
                Some(timeout),
            )
            .await?;
        parse_poll_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_async_get_data_decodes_envelope() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/getData")
            .match_query(Matcher::UrlEncoded(
                "path".into(),
                "settings:/deviceName".into(),
            ))
            .with_body(r#"[{"type":"string_","string_":"Living Room"}]"#)
            .create_async()
            .await;

        let client = AsyncKefClient::new(server.host_with_port());
        let value = client.get_data(paths::DEVICE_NAME).await.unwrap();
        assert_eq!(value.as_str(), Some("Living Room"));
    }

    #[tokio::test]
    async fn test_async_poll_queue_round() {
        let mut server = mockito::Server::new_async().await;
        let _subscribe = server
            .mock("GET", "/api/event/modifyQueue")
            .with_body(r#""evq-3""#)
            .create_async()
            .await;
        let _poll = server
            .mock("GET", "/api/event/pollQueue")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("queueId".into(), "evq-3".into()),
                Matcher::UrlEncoded("timeout".into(), "5".into()),
            ]))
            .with_body(r#"[]"#)
            .create_async()
            .await;

        let client = AsyncKefClient::new(server.host_with_port());
        let queue_id = client.modify_queue(paths::SUBSCRIBED).await.unwrap();
        assert_eq!(queue_id, "evq-3");

        let events = client
            .poll_queue(&queue_id, Duration::from_secs(5))
            .await
            .unwrap();
        assert!(events.is_empty());
    }
}
