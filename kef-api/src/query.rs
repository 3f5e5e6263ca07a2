//! Request construction shared by the blocking and async clients
//!
//! Both client surfaces build identical URLs and query strings through
//! this module, so they cannot drift apart.

use std::time::Duration;

use serde_json::{json, Value};

pub(crate) const GET_DATA: &str = "api/getData";
pub(crate) const SET_DATA: &str = "api/setData";
pub(crate) const MODIFY_QUEUE: &str = "api/event/modifyQueue";
pub(crate) const POLL_QUEUE: &str = "api/event/pollQueue";

pub(crate) fn get_data(path: &str) -> Vec<(&'static str, String)> {
    vec![
        ("path", path.to_string()),
        ("roles", "value".to_string()),
    ]
}

pub(crate) fn set_data(path: &str, value: &Value) -> Vec<(&'static str, String)> {
    vec![
        ("path", path.to_string()),
        ("roles", "value".to_string()),
        ("value", value.to_string()),
    ]
}

pub(crate) fn activate(path: &str, value: &Value) -> Vec<(&'static str, String)> {
    vec![
        ("path", path.to_string()),
        ("roles", "activate".to_string()),
        ("value", value.to_string()),
    ]
}

pub(crate) fn modify_queue(subscribe: &[&str]) -> Vec<(&'static str, String)> {
    let request = json!({
        "subscribe": subscribe
            .iter()
            .map(|path| json!({ "path": path, "type": "itemWithValue" }))
            .collect::<Vec<_>>(),
        "unsubscribe": [],
    });
    vec![("queryRequest", request.to_string())]
}

pub(crate) fn poll_queue(queue_id: &str, timeout: Duration) -> Vec<(&'static str, String)> {
    vec![
        ("queueId", queue_id.to_string()),
        ("timeout", timeout.as_secs().to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_data_params() {
        let params = get_data("player:volume");
        assert_eq!(params[0], ("path", "player:volume".to_string()));
        assert_eq!(params[1], ("roles", "value".to_string()));
    }

    #[test]
    fn test_set_data_serializes_value() {
        let params = set_data("player:volume", &json!({"type":"i32_","i32_":30}));
        assert_eq!(params[2].0, "value");
        assert_eq!(params[2].1, r#"{"i32_":30,"type":"i32_"}"#);
    }

    #[test]
    fn test_modify_queue_lists_paths() {
        let params = modify_queue(&["player:volume", "settings:/deviceName"]);
        assert_eq!(params.len(), 1);
        let request: Value = serde_json::from_str(&params[0].1).unwrap();
        assert_eq!(request["subscribe"][0]["path"], "player:volume");
        assert_eq!(request["subscribe"][1]["path"], "settings:/deviceName");
        assert_eq!(request["unsubscribe"], json!([]));
    }

    #[test]
    fn test_poll_queue_params() {
        let params = poll_queue("evq-7", Duration::from_secs(10));
        assert_eq!(params[0], ("queueId", "evq-7".to_string()));
        assert_eq!(params[1], ("timeout", "10".to_string()));
    }
}
