//! Integration test support for Loomline.
//!
//! # Running Tests
//!
//! These tests run against a live server and database:
//!
//! ```bash
//! # Start PostgreSQL and apply migrations
//! cargo run -p loomline-cli -- migrate
//!
//! # Start the server
//! cargo run -p loomline-server
//!
//! # Run the ignored integration tests
//! cargo test -p loomline-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `LOOMLINE_BASE_URL` - Server base URL (default: `http://localhost:3001`)
//! - `LOOMLINE_ADMIN_EMAIL` / `LOOMLINE_ADMIN_PASSWORD` - An existing admin
//!   account (promote one with `loom-cli admin promote`)

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Server base URL, configurable via environment.
#[must_use]
pub fn base_url() -> String {
    std::env::var("LOOMLINE_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// A registered account with its bearer token.
pub struct TestUser {
    pub email: String,
    pub password: String,
    pub token: String,
    pub user_id: String,
}

/// Register a fresh throwaway account and return its session.
///
/// # Panics
///
/// Panics if the server is unreachable or registration fails.
pub async fn register_user(client: &Client) -> TestUser {
    let email = format!("test-{}@example.com", Uuid::new_v4());
    let password = "integration-password".to_string();

    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({
            "name": "Integration Test",
            "email": email,
            "password": password,
        }))
        .send()
        .await
        .expect("register request");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("register body");
    TestUser {
        email,
        password,
        token: body["token"].as_str().expect("token").to_string(),
        user_id: body["user"]["id"].as_str().expect("user id").to_string(),
    }
}

/// Log in with an existing account and return the bearer token.
///
/// # Panics
///
/// Panics if the login fails.
pub async fn login(client: &Client, email: &str, password: &str) -> String {
    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({"email": email, "password": password}))
        .send()
        .await
        .expect("login request");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("login body");
    body["token"].as_str().expect("token").to_string()
}

/// Token for the configured admin account.
///
/// # Panics
///
/// Panics if the admin credentials are not configured or wrong.
pub async fn admin_token(client: &Client) -> String {
    let email =
        std::env::var("LOOMLINE_ADMIN_EMAIL").expect("LOOMLINE_ADMIN_EMAIL must be set");
    let password =
        std::env::var("LOOMLINE_ADMIN_PASSWORD").expect("LOOMLINE_ADMIN_PASSWORD must be set");
    login(client, &email, &password).await
}

/// A minimal valid product-creation body.
#[must_use]
pub fn sample_product_body(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Integration test product",
        "price": "49.99",
        "discount": 10,
        "category": "Test",
        "images": [],
        "colors": ["black"],
        "sizes": ["M"],
        "stock": 5,
    })
}
