//! Integration tests for Construct.
//!
//! # Running Tests
//!
//! ```bash
//! # Apply migrations against a local database
//! cargo run -p construct-cli -- migrate
//!
//! # Start the server
//! cargo run -p construct-server
//!
//! # Run integration tests
//! cargo test -p construct-integration-tests -- --ignored
//! ```
//!
//! Tests are `#[ignore]`d by default because they need a running server
//! and database.

use reqwest::Client;

/// Base URL for the console API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("CONSTRUCT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create a cookie-holding client for session-based flows.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Connect to the test database for seeding fixtures the API cannot
/// produce, such as backdated rows.
///
/// Uses `CONSTRUCT_DATABASE_URL`, falling back to `DATABASE_URL`.
///
/// # Panics
///
/// Panics if neither variable is set or the connection fails.
pub async fn db_pool() -> sqlx::PgPool {
    let url = std::env::var("CONSTRUCT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("CONSTRUCT_DATABASE_URL or DATABASE_URL must be set");
    sqlx::PgPool::connect(&url)
        .await
        .expect("Failed to connect to database")
}

/// Log in as the seeded admin account and return the client.
///
/// Uses `CONSTRUCT_TEST_ADMIN_EMAIL` / `CONSTRUCT_TEST_ADMIN_PASSWORD`,
/// falling back to the local defaults.
///
/// # Panics
///
/// Panics if the login request fails.
pub async fn admin_client() -> Client {
    let client = client();
    let email = std::env::var("CONSTRUCT_TEST_ADMIN_EMAIL")
        .unwrap_or_else(|_| "admin@example.com".to_string());
    let password = std::env::var("CONSTRUCT_TEST_ADMIN_PASSWORD")
        .unwrap_or_else(|_| "password123".to_string());

    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in");
    assert!(resp.status().is_success(), "admin login failed: {}", resp.status());

    client
}
