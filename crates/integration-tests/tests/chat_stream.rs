//! Integration tests for session setup and the streaming relay.
//!
//! These tests additionally require the assistant backend to be running
//! at `BACKEND_URL`.
//!
//! Run with: cargo test -p construct-integration-tests -- --ignored

use construct_integration_tests::{admin_client, base_url};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running server, database, and assistant backend"]
async fn session_setup_reports_outcome() {
    let admin = admin_client().await;
    let base = base_url();

    let resp = admin
        .post(format!("{base}/api/gpts"))
        .json(&json!({
            "name": "Echo Bot",
            "description": "Repeats what it is told",
            "model": "gpt-4o-mini",
            "instruction": "Repeat the user's message back to them.",
        }))
        .send()
        .await
        .expect("Failed to create assistant");
    assert_eq!(resp.status(), StatusCode::OK);
    let gpt: Value = resp.json().await.expect("Failed to parse body");

    let resp = admin
        .post(format!("{base}/api/sessions"))
        .json(&json!({ "gptId": gpt["id"] }))
        .send()
        .await
        .expect("Failed to create session");
    assert_eq!(resp.status(), StatusCode::OK);

    let setup: Value = resp.json().await.expect("Failed to parse body");
    assert!(setup["sessionId"].as_str().is_some_and(|s| !s.is_empty()));
    assert!(setup["configPushed"].is_boolean());
    assert!(setup["knowledgeBasePushed"].is_boolean());
}

#[tokio::test]
#[ignore = "Requires running server, database, and assistant backend"]
async fn stream_without_session_id_is_400() {
    let admin = admin_client().await;

    let resp = admin
        .post(format!("{}/api/chat/stream", base_url()))
        .json(&json!({ "message": "hello" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server, database, and assistant backend"]
async fn stream_relays_bytes() {
    let admin = admin_client().await;
    let base = base_url();

    let resp = admin
        .post(format!("{base}/api/gpts"))
        .json(&json!({
            "name": "Echo Bot",
            "description": "Repeats what it is told",
            "model": "gpt-4o-mini",
            "instruction": "Repeat the user's message back to them.",
        }))
        .send()
        .await
        .expect("Failed to create assistant");
    let gpt: Value = resp.json().await.expect("Failed to parse body");

    let resp = admin
        .post(format!("{base}/api/sessions"))
        .json(&json!({ "gptId": gpt["id"] }))
        .send()
        .await
        .expect("Failed to create session");
    let setup: Value = resp.json().await.expect("Failed to parse body");
    let session_id = setup["sessionId"].as_str().expect("sessionId missing");

    let resp = admin
        .post(format!("{base}/api/chat/stream"))
        .json(&json!({ "sessionId": session_id, "message": "hello" }))
        .send()
        .await
        .expect("Failed to start stream");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("text/plain")
    );

    let body = resp.bytes().await.expect("Failed to read stream");
    assert!(!body.is_empty());
}
