//! Integration tests for team management.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p construct-server)
//! - A seeded admin account (construct-cli user create)
//!
//! Run with: cargo test -p construct-integration-tests -- --ignored

use construct_integration_tests::{admin_client, base_url, client};
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn team_list_requires_admin() {
    let anon = client();
    let resp = anon
        .get(format!("{}/api/team", base_url()))
        .send()
        .await
        .expect("Failed to list team");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn admin_cannot_demote_or_remove_self() {
    let admin = admin_client().await;
    let base = base_url();

    let resp = admin
        .get(format!("{base}/api/auth/me"))
        .send()
        .await
        .expect("Failed to fetch current user");
    assert_eq!(resp.status(), StatusCode::OK);
    let me: Value = resp.json().await.expect("Failed to parse body");
    let id = me["id"].as_i64().expect("id missing");
    let email = me["email"].as_str().expect("email missing").to_string();
    let name = me["name"].as_str().unwrap_or("Admin").to_string();

    let resp = admin
        .put(format!("{base}/api/team/{id}"))
        .json(&serde_json::json!({ "email": email, "name": name, "role": "user" }))
        .send()
        .await
        .expect("Failed to send update");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = admin
        .delete(format!("{base}/api/team/{id}"))
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Still an admin afterwards
    let resp = admin
        .get(format!("{base}/api/team"))
        .send()
        .await
        .expect("Failed to list team");
    assert_eq!(resp.status(), StatusCode::OK);
}
