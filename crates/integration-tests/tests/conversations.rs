//! Integration tests for conversation save/list/delete.
//!
//! Run with: cargo test -p construct-integration-tests -- --ignored

use construct_integration_tests::{admin_client, base_url};
use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

async fn create_assistant(admin: &reqwest::Client) -> Value {
    let resp = admin
        .post(format!("{}/api/gpts", base_url()))
        .json(&json!({
            "name": "Note Taker",
            "description": "Keeps track of meeting notes",
            "model": "gpt-4o-mini",
            "instruction": "Summarize whatever the user pastes into bullet points.",
        }))
        .send()
        .await
        .expect("Failed to create assistant");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Failed to parse body")
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn conversation_save_is_idempotent_per_session() {
    let admin = admin_client().await;
    let base = base_url();
    let gpt = create_assistant(&admin).await;
    let session_id = Uuid::new_v4().to_string();

    let resp = admin
        .post(format!("{base}/api/conversations"))
        .json(&json!({
            "gptId": gpt["id"],
            "sessionId": session_id,
            "messages": [
                { "role": "user", "content": "What is the capital of France?" },
                { "role": "assistant", "content": "Paris." },
            ],
        }))
        .send()
        .await
        .expect("Failed to save conversation");
    assert_eq!(resp.status(), StatusCode::OK);
    let first: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(
        first["title"].as_str(),
        Some("What is the capital of France?")
    );

    // Saving again under the same session updates in place.
    let resp = admin
        .post(format!("{base}/api/conversations"))
        .json(&json!({
            "gptId": gpt["id"],
            "sessionId": session_id,
            "messages": [
                { "role": "user", "content": "What is the capital of France?" },
                { "role": "assistant", "content": "Paris." },
                { "role": "user", "content": "And of Spain?" },
                { "role": "assistant", "content": "Madrid." },
            ],
        }))
        .send()
        .await
        .expect("Failed to save conversation");
    assert_eq!(resp.status(), StatusCode::OK);
    let second: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(second["id"], first["id"]);

    let resp = admin
        .get(format!("{base}/api/conversations/{}", first["id"]))
        .send()
        .await
        .expect("Failed to fetch conversation");
    assert_eq!(resp.status(), StatusCode::OK);
    let detail: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(detail["messages"].as_array().map(Vec::len), Some(4));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn conversation_requires_messages() {
    let admin = admin_client().await;
    let gpt = create_assistant(&admin).await;

    let resp = admin
        .post(format!("{}/api/conversations", base_url()))
        .json(&json!({
            "gptId": gpt["id"],
            "sessionId": Uuid::new_v4().to_string(),
            "messages": [],
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn conversation_delete_then_404() {
    let admin = admin_client().await;
    let base = base_url();
    let gpt = create_assistant(&admin).await;

    let resp = admin
        .post(format!("{base}/api/conversations"))
        .json(&json!({
            "gptId": gpt["id"],
            "sessionId": Uuid::new_v4().to_string(),
            "messages": [{ "role": "user", "content": "Delete me" }],
        }))
        .send()
        .await
        .expect("Failed to save conversation");
    let saved: Value = resp.json().await.expect("Failed to parse body");

    let resp = admin
        .delete(format!("{base}/api/conversations/{}", saved["id"]))
        .send()
        .await
        .expect("Failed to delete conversation");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = admin
        .get(format!("{base}/api/conversations/{}", saved["id"]))
        .send()
        .await
        .expect("Failed to fetch conversation");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
