//! Integration tests for the admin session endpoints.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied (gg-cli migrate)
//! - The admin server running (cargo run -p greengrocer-admin)
//! - A seeded admin whose credentials are in the environment:
//!   `TEST_ADMIN_EMAIL` / `TEST_ADMIN_PASSWORD`
//!
//! Run with: cargo test -p greengrocer-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use greengrocer_admin::middleware::ADMIN_TOKEN_COOKIE;
use greengrocer_integration_tests::TestContext;

fn test_admin_credentials() -> (String, String) {
    let email = std::env::var("TEST_ADMIN_EMAIL")
        .unwrap_or_else(|_| "owner@greengrocer.example".to_string());
    let password =
        std::env::var("TEST_ADMIN_PASSWORD").unwrap_or_else(|_| "crisp-lettuce-42".to_string());
    (email, password)
}

async fn login(ctx: &TestContext) -> (String, Value) {
    let (email, password) = test_admin_credentials();
    let resp = ctx
        .client
        .post(format!("{}/admin/login", ctx.admin_url))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to reach admin server");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse login response");
    let token = body["token"]
        .as_str()
        .expect("Login response missing token")
        .to_owned();
    (token, body)
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded admin"]
async fn test_health_endpoints() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .get(format!("{}/health", ctx.admin_url))
        .send()
        .await
        .expect("Failed to reach admin server");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ctx
        .client
        .get(format!("{}/health/ready", ctx.admin_url))
        .send()
        .await
        .expect("Failed to reach admin server");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded admin"]
async fn test_login_returns_token_and_cookie() {
    let ctx = TestContext::new();
    let (email, password) = test_admin_credentials();

    let resp = ctx
        .client
        .post(format!("{}/admin/login", ctx.admin_url))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to reach admin server");
    assert_eq!(resp.status(), StatusCode::OK);

    let set_cookie = resp
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("Login response missing Set-Cookie")
        .to_owned();
    assert!(set_cookie.starts_with(&format!("{ADMIN_TOKEN_COOKIE}=")));

    let body: Value = resp.json().await.expect("Failed to parse login response");
    assert_eq!(body["success"], true);
    assert!(!body["token"].as_str().expect("missing token").is_empty());
    assert!(body["admin"]["id"].is_number());

    // The cookie store picked up adminToken; validation works cookie-only.
    let resp = ctx
        .client
        .get(format!("{}/admin/validate-token", ctx.admin_url))
        .send()
        .await
        .expect("Failed to reach admin server");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded admin"]
async fn test_validate_with_bearer_token() {
    let ctx = TestContext::new();
    let (token, _) = login(&ctx).await;

    let resp = ctx
        .client
        .get(format!("{}/admin/validate-token", ctx.admin_url))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to reach admin server");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert!(body["admin"]["email"].is_string());
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded admin"]
async fn test_validate_without_token_rejected() {
    let ctx = TestContext::new();

    // Fresh client without the cookie store's token.
    let resp = reqwest::Client::new()
        .get(format!("{}/admin/validate-token", ctx.admin_url))
        .send()
        .await
        .expect("Failed to reach admin server");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["code"], "NO_TOKEN");
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded admin"]
async fn test_login_with_wrong_password_rejected() {
    let ctx = TestContext::new();
    let (email, _) = test_admin_credentials();

    let resp = ctx
        .client
        .post(format!("{}/admin/login", ctx.admin_url))
        .json(&json!({ "email": email, "password": format!("wrong-{}", uuid::Uuid::new_v4()) }))
        .send()
        .await
        .expect("Failed to reach admin server");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded admin"]
async fn test_logout_then_relogin() {
    let ctx = TestContext::new();
    let (token, _) = login(&ctx).await;

    let resp = ctx
        .client
        .post(format!("{}/admin/logout", ctx.admin_url))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to reach admin server");
    assert_eq!(resp.status(), StatusCode::OK);

    // Logout is idempotent with respect to registry state; a fresh login
    // must succeed afterwards.
    let (token, _) = login(&ctx).await;
    let resp = ctx
        .client
        .get(format!("{}/admin/validate-token", ctx.admin_url))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to reach admin server");
    assert_eq!(resp.status(), StatusCode::OK);
}
