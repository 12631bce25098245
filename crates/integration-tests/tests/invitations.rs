//! Integration tests for the invitation lifecycle.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p construct-server)
//! - A seeded admin account (construct-cli user create)
//!
//! Run with: cargo test -p construct-integration-tests -- --ignored

use construct_integration_tests::{admin_client, base_url, client, db_pool};
use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

fn unique_email() -> String {
    format!("invitee-{}@example.com", Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn invitation_roundtrip() {
    let admin = admin_client().await;
    let base = base_url();
    let email = unique_email();

    // Issue an invitation
    let resp = admin
        .post(format!("{base}/api/invitations"))
        .json(&json!({ "email": email, "name": "Invited User" }))
        .send()
        .await
        .expect("Failed to create invitation");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse body");
    let token = body["token"].as_str().expect("token missing").to_string();

    // The public token lookup works without authentication
    let anon = client();
    let resp = anon
        .get(format!("{base}/api/invitations/{token}"))
        .send()
        .await
        .expect("Failed to look up invitation");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(body["email"].as_str(), Some(email.as_str()));

    // Accept the invitation by registering
    let resp = anon
        .post(format!("{base}/api/auth/register"))
        .json(&json!({ "token": token, "password": "a-strong-password" }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::OK);

    // Registration logs the new user in
    let resp = anon
        .get(format!("{base}/api/auth/me"))
        .send()
        .await
        .expect("Failed to fetch current user");
    assert_eq!(resp.status(), StatusCode::OK);

    // Reusing the token fails
    let resp = client()
        .post(format!("{base}/api/auth/register"))
        .json(&json!({ "token": token, "password": "another-password" }))
        .send()
        .await
        .expect("Failed to send reuse request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn duplicate_pending_invitation_rejected() {
    let admin = admin_client().await;
    let base = base_url();
    let email = unique_email();

    let resp = admin
        .post(format!("{base}/api/invitations"))
        .json(&json!({ "email": email, "name": "First" }))
        .send()
        .await
        .expect("Failed to create invitation");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = admin
        .post(format!("{base}/api/invitations"))
        .json(&json!({ "email": email, "name": "Second" }))
        .send()
        .await
        .expect("Failed to send duplicate request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn accept_endpoint_creates_account() {
    let admin = admin_client().await;
    let base = base_url();
    let email = unique_email();

    let resp = admin
        .post(format!("{base}/api/invitations"))
        .json(&json!({ "email": email, "name": "Accepted Via Link" }))
        .send()
        .await
        .expect("Failed to create invitation");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse body");
    let token = body["token"].as_str().expect("token missing");

    let anon = client();
    let resp = anon
        .post(format!("{base}/api/invitations/{token}/accept"))
        .json(&json!({ "password": "a-strong-password" }))
        .send()
        .await
        .expect("Failed to accept invitation");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = anon
        .get(format!("{base}/api/auth/me"))
        .send()
        .await
        .expect("Failed to fetch current user");
    assert_eq!(resp.status(), StatusCode::OK);
    let me: Value = resp.json().await.expect("Failed to parse body");
    assert_eq!(me["email"].as_str(), Some(email.as_str()));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn expired_token_is_410_on_read_and_accept() {
    let admin = admin_client().await;
    let base = base_url();
    let email = unique_email();

    let resp = admin
        .post(format!("{base}/api/invitations"))
        .json(&json!({ "email": email, "name": "Late Arrival" }))
        .send()
        .await
        .expect("Failed to create invitation");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse body");
    let token = body["token"].as_str().expect("token missing").to_string();

    // Push the invitation past its expiry
    let pool = db_pool().await;
    sqlx::query("UPDATE invitation SET expires_at = NOW() - INTERVAL '1 day' WHERE token = $1")
        .bind(&token)
        .execute(&pool)
        .await
        .expect("Failed to backdate invitation");

    let anon = client();
    let resp = anon
        .get(format!("{base}/api/invitations/{token}"))
        .send()
        .await
        .expect("Failed to look up invitation");
    assert_eq!(resp.status(), StatusCode::GONE);

    let resp = anon
        .post(format!("{base}/api/invitations/{token}/accept"))
        .json(&json!({ "password": "a-strong-password" }))
        .send()
        .await
        .expect("Failed to send accept");
    assert_eq!(resp.status(), StatusCode::GONE);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn unknown_token_is_404() {
    let resp = client()
        .get(format!("{}/api/invitations/not-a-real-token", base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn non_admin_cannot_issue_invitations() {
    let resp = client()
        .post(format!("{}/api/invitations", base_url()))
        .json(&json!({ "email": unique_email(), "name": "Anon" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
