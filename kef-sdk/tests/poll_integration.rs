//! Integration tests for the long-poll change feed
//!
//! A scripted device serves a recorded event timeline; the tests check
//! the caller-observable contract: what one poll reports, how the two
//! connector surfaces compare, and how the poll path behaves under
//! overlap, cancellation, and a lost event queue.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use kef_sdk::{AsyncKefConnector, KefConnector, SdkError, SemanticKey};
use serde_json::json;

const POLL_BUDGET: Duration = Duration::from_secs(1);

/// A recorded device timeline: one pollQueue response body per round
const ROUNDS: &[&str] = &[
    // Round 1: a single volume change.
    r#"[{"path":"player:volume","itemType":"update","itemValue":{"type":"i32_","i32_":32}}]"#,
    // Round 2: three rapid volume changes coalesce to the last.
    r#"[
        {"path":"player:volume","itemType":"update","itemValue":{"type":"i32_","i32_":10}},
        {"path":"player:volume","itemType":"update","itemValue":{"type":"i32_","i32_":20}},
        {"path":"player:volume","itemType":"update","itemValue":{"type":"i32_","i32_":30}}
    ]"#,
    // Round 3: playback starts; the play position rides along.
    r#"[
        {"path":"player:player/data","itemType":"update","itemValue":{"state":"playing","status":{"duration":200000},"trackRoles":{"title":"Song A"}}},
        {"path":"player:player/data/playTime","itemType":"update","itemValue":{"type":"i64_","i64_":1000}}
    ]"#,
    // Round 4: only the position ticked.
    r#"[{"path":"player:player/data/playTime","itemType":"update","itemValue":{"type":"i64_","i64_":2000}}]"#,
    // Round 5: the wait budget elapsed with nothing to report.
    r#"[]"#,
    // Round 6: an unmapped device path.
    r#"[{"path":"settings:/kef/host/maximumVolume","itemType":"update","itemValue":{"type":"i32_","i32_":80}}]"#,
];

fn scripted_body(counter: &AtomicUsize) -> Vec<u8> {
    let i = counter.fetch_add(1, Ordering::SeqCst).min(ROUNDS.len() - 1);
    ROUNDS[i].as_bytes().to_vec()
}

/// Drive the blocking connector through the recorded timeline
fn blocking_outputs() -> Vec<String> {
    let mut server = mockito::Server::new();
    let _queue = server
        .mock("GET", "/api/event/modifyQueue")
        .with_body(r#""evq-1""#)
        .create();
    let counter = Arc::new(AtomicUsize::new(0));
    let _poll = server
        .mock("GET", "/api/event/pollQueue")
        .expect(ROUNDS.len())
        .with_body_from_request({
            let counter = Arc::clone(&counter);
            move |_| scripted_body(&counter)
        })
        .create();

    let speaker = KefConnector::new(server.host_with_port());
    (0..ROUNDS.len())
        .map(|_| {
            let changes = speaker.poll_with(POLL_BUDGET, false).unwrap();
            serde_json::to_string(&changes).unwrap()
        })
        .collect()
}

/// Drive the suspending connector through the same timeline
async fn suspending_outputs() -> Vec<String> {
    let mut server = mockito::Server::new_async().await;
    let _queue = server
        .mock("GET", "/api/event/modifyQueue")
        .with_body(r#""evq-1""#)
        .create_async()
        .await;
    let counter = Arc::new(AtomicUsize::new(0));
    let _poll = server
        .mock("GET", "/api/event/pollQueue")
        .expect(ROUNDS.len())
        .with_body_from_request({
            let counter = Arc::clone(&counter);
            move |_| scripted_body(&counter)
        })
        .create_async()
        .await;

    let speaker = AsyncKefConnector::new(server.host_with_port());
    let mut outputs = Vec::with_capacity(ROUNDS.len());
    for _ in 0..ROUNDS.len() {
        let changes = speaker.poll_with(POLL_BUDGET, false).await.unwrap();
        outputs.push(serde_json::to_string(&changes).unwrap());
    }
    outputs
}

#[test]
fn test_blocking_and_suspending_polls_are_byte_identical() {
    let blocking = blocking_outputs();
    let suspending = tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(suspending_outputs());

    assert_eq!(blocking, suspending);

    // Spot-check the timeline against the recorded rounds.
    let round1: serde_json::Value = serde_json::from_str(&blocking[0]).unwrap();
    assert_eq!(round1, json!({"volume": 32}));

    let round2: serde_json::Value = serde_json::from_str(&blocking[1]).unwrap();
    assert_eq!(round2, json!({"volume": 30}));

    // Playback start reports metadata and state but not the position.
    let round3: serde_json::Value = serde_json::from_str(&blocking[2]).unwrap();
    assert_eq!(round3["status"], "playing");
    assert_eq!(round3["song_length"], 200000);
    assert_eq!(round3["song_info"]["title"], "Song A");
    assert!(round3.get("song_status").is_none());

    // A lone position tick is suppressed; a quiet budget is empty.
    assert_eq!(blocking[3], "{}");
    assert_eq!(blocking[4], "{}");

    // The unmapped path lands in `other` under its raw sub-key.
    let round6: serde_json::Value = serde_json::from_str(&blocking[5]).unwrap();
    assert_eq!(round6, json!({"other": {"maximumVolume": 80}}));
}

#[test]
fn test_lost_queue_surfaces_error_then_reregisters() {
    let mut server = mockito::Server::new();
    let ids = AtomicUsize::new(0);
    let queue = server
        .mock("GET", "/api/event/modifyQueue")
        .expect(2)
        .with_body_from_request(move |_| {
            let i = ids.fetch_add(1, Ordering::SeqCst);
            format!(r#""evq-{i}""#).into_bytes()
        })
        .create();
    let polls = AtomicUsize::new(0);
    let _poll = server
        .mock("GET", "/api/event/pollQueue")
        .with_body_from_request(move |_| {
            if polls.fetch_add(1, Ordering::SeqCst) == 0 {
                // The device no longer knows this queue.
                br#"{"error":"invalid queueId"}"#.to_vec()
            } else {
                b"[]".to_vec()
            }
        })
        .create();

    let speaker = KefConnector::new(server.host_with_port());

    let err = speaker.poll_with(POLL_BUDGET, false).unwrap_err();
    assert!(matches!(err, SdkError::Api(_)));

    // The next poll registers a fresh queue and succeeds.
    let changes = speaker.poll_with(POLL_BUDGET, false).unwrap();
    assert!(changes.is_empty());
    queue.assert();
}

#[test]
fn test_overlapping_blocking_polls_fail_fast() {
    let mut server = mockito::Server::new();
    let _queue = server
        .mock("GET", "/api/event/modifyQueue")
        .with_body(r#""evq-1""#)
        .create();
    let _poll = server
        .mock("GET", "/api/event/pollQueue")
        .with_body_from_request(|_| {
            std::thread::sleep(Duration::from_millis(400));
            b"[]".to_vec()
        })
        .create();

    let speaker = Arc::new(KefConnector::new(server.host_with_port()));
    let in_flight = {
        let speaker = Arc::clone(&speaker);
        std::thread::spawn(move || speaker.poll_with(POLL_BUDGET, false))
    };

    std::thread::sleep(Duration::from_millis(100));
    let err = speaker.poll().unwrap_err();
    assert!(matches!(err, SdkError::PollInProgress));

    // The in-flight poll is unaffected by the rejected one.
    let changes = in_flight.join().unwrap().unwrap();
    assert!(changes.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_overlapping_suspending_polls_fail_fast() {
    let mut server = mockito::Server::new_async().await;
    let _queue = server
        .mock("GET", "/api/event/modifyQueue")
        .with_body(r#""evq-1""#)
        .create_async()
        .await;
    let _poll = server
        .mock("GET", "/api/event/pollQueue")
        .with_body_from_request(|_| {
            std::thread::sleep(Duration::from_millis(400));
            b"[]".to_vec()
        })
        .create_async()
        .await;

    let speaker = Arc::new(AsyncKefConnector::new(server.host_with_port()));
    let in_flight = {
        let speaker = Arc::clone(&speaker);
        tokio::spawn(async move { speaker.poll_with(POLL_BUDGET, false).await })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    let err = speaker.poll().await.unwrap_err();
    assert!(matches!(err, SdkError::PollInProgress));

    let changes = in_flight.await.unwrap().unwrap();
    assert!(changes.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancelled_poll_commits_nothing() {
    let mut server = mockito::Server::new_async().await;
    let _queue = server
        .mock("GET", "/api/event/modifyQueue")
        .with_body(r#""evq-1""#)
        .create_async()
        .await;
    let _poll = server
        .mock("GET", "/api/event/pollQueue")
        .with_body_from_request(|_| {
            std::thread::sleep(Duration::from_millis(300));
            br#"[{"path":"player:volume","itemType":"update","itemValue":{"type":"i32_","i32_":32}}]"#
                .to_vec()
        })
        .create_async()
        .await;

    let speaker = AsyncKefConnector::new(server.host_with_port());

    // Cancel mid-wait: the future is dropped at the transport wait.
    let cancelled =
        tokio::time::timeout(Duration::from_millis(100), speaker.poll_with(POLL_BUDGET, false))
            .await;
    assert!(cancelled.is_err());

    // Nothing was committed, so the change still surfaces in full.
    let changes = speaker.poll_with(POLL_BUDGET, false).await.unwrap();
    assert_eq!(changes.get(SemanticKey::Volume), Some(&json!(32)));
}
