//! End-to-end support chat: token minting and channel provisioning.
//!
//! Requires a running server with valid Stream credentials.

use loomline_integration_tests::{admin_token, base_url, register_user};
use reqwest::{Client, StatusCode};
use serde_json::Value;

#[tokio::test]
#[ignore = "Requires running server and Stream credentials"]
async fn chat_token_requires_auth() {
    let client = Client::new();

    let resp = client
        .get(format!("{}/api/auth/chat-token", base_url()))
        .send()
        .await
        .expect("chat-token request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running server and Stream credentials"]
async fn chat_token_is_minted_for_logged_in_users() {
    let client = Client::new();
    let user = register_user(&client).await;

    let resp = client
        .get(format!("{}/api/auth/chat-token", base_url()))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("chat-token request");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("token body");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
#[ignore = "Requires running server and Stream credentials"]
async fn support_channel_is_stable_across_fetches() {
    let client = Client::new();
    let user = register_user(&client).await;

    let fetch = || async {
        let resp = client
            .get(format!("{}/api/chat/support-channel", base_url()))
            .bearer_auth(&user.token)
            .send()
            .await
            .expect("support-channel request");
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.expect("channel body");
        body["channel"].as_str().expect("channel id").to_string()
    };

    let first = fetch().await;
    let second = fetch().await;

    // Same user, same channel, every time.
    assert_eq!(first, second);
    assert!(first.contains(&format!("support-{}", user.user_id)));
}

#[tokio::test]
#[ignore = "Requires running server, database, and admin credentials"]
async fn client_listing_is_admin_only() {
    let client = Client::new();
    let user = register_user(&client).await;

    let forbidden = client
        .get(format!("{}/api/users/clients", base_url()))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("clients request");
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let token = admin_token(&client).await;
    let resp = client
        .get(format!("{}/api/users/clients", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("clients request");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("clients body");
    let clients = body["clients"].as_array().expect("clients array");
    // The freshly registered user shows up; admins never do.
    assert!(clients.iter().any(|c| c["id"] == user.user_id.as_str()));
    assert!(clients.iter().all(|c| c["role"] != "admin"));
}
