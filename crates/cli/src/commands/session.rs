//! Operator session commands: login and the validation poller.
//!
//! `login` obtains a token from a running admin server and stores it in a
//! token file. `watch` re-validates that token on a fixed interval and
//! reacts to rejection: a `CREDENTIALS_UPDATED` rejection gets a prominent
//! notice and a short delay before exiting (so the notice is seen), any
//! other rejection discards the token quietly, and a transport error is
//! deliberately non-fatal — the token is kept and the next tick retries.
//!
//! # Environment Variables
//!
//! - `ADMIN_BASE_URL` - Base URL of the running admin server
//!   (default: `http://localhost:4001`)

use std::path::Path;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// Default token file, in the working directory.
pub const DEFAULT_TOKEN_FILE: &str = ".gg-admin-token";

/// Seconds the forced-logout notice stays on screen before exiting.
const NOTICE_DELAY_SECONDS: u64 = 3;

/// Errors that can occur during session commands.
#[derive(Debug, Error)]
pub enum SessionError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Token file could not be read or written.
    #[error("Token file error: {0}")]
    Io(#[from] std::io::Error),

    /// Server rejected the login.
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// No stored token to watch.
    #[error("No token at {0}; run `gg-cli admin login` first")]
    NoToken(String),

    /// The session was terminated while watching.
    #[error("Session terminated; log in again with `gg-cli admin login`")]
    SessionTerminated,
}

/// Base URL for the admin server (configurable via environment).
fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| {
        tracing::warn!("ADMIN_BASE_URL not set, using default");
        "http://localhost:4001".to_owned()
    })
}

/// Log in against a running admin server and store the token.
///
/// # Errors
///
/// Returns `SessionError::LoginFailed` on a rejected login (including a
/// flagged identity, which is reported distinctly) and `SessionError::Io`
/// if the token file cannot be written.
pub async fn login(email: &str, password: &str, token_file: &str) -> Result<(), SessionError> {
    dotenvy::dotenv().ok();
    let base_url = admin_base_url();

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{base_url}/admin/login"))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await?;

    let status = response.status();
    let body: Value = response.json().await?;

    if !status.is_success() {
        if body["code"] == "CREDENTIALS_UPDATED" {
            return Err(SessionError::LoginFailed(
                "this account's credentials were updated; a logout must be processed before \
                 logging in again"
                    .to_owned(),
            ));
        }
        let message = body["message"].as_str().unwrap_or("login rejected");
        return Err(SessionError::LoginFailed(message.to_owned()));
    }

    let token = body["token"].as_str().unwrap_or_default();
    if token.is_empty() {
        return Err(SessionError::LoginFailed(
            "server response did not include a token".to_owned(),
        ));
    }

    std::fs::write(token_file, token)?;
    let name = body["admin"]["name"].as_str().unwrap_or("admin");
    tracing::info!("Logged in as {}. Token stored in {}", name, token_file);
    tracing::info!("Watch it with: gg-cli admin watch");

    Ok(())
}

/// Poll the stored token against the server until it stops being valid.
///
/// # Errors
///
/// Returns `SessionError::NoToken` if the token file is absent and
/// `SessionError::SessionTerminated` once the server rejects the token.
pub async fn watch(token_file: &str, interval: u64) -> Result<(), SessionError> {
    dotenvy::dotenv().ok();
    let base_url = admin_base_url();
    let client = reqwest::Client::new();

    tracing::info!(
        "Watching {} against {} every {}s",
        token_file,
        base_url,
        interval
    );

    loop {
        // Local sanity check before going to the network.
        let token = match read_token(token_file) {
            Some(token) => token,
            None => return Err(SessionError::NoToken(token_file.to_owned())),
        };
        if !looks_like_token(&token) {
            tracing::warn!("Stored token is malformed; discarding it");
            discard_token(token_file);
            return Err(SessionError::SessionTerminated);
        }

        match client
            .get(format!("{base_url}/admin/validate-token"))
            .bearer_auth(&token)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                let body: Value = response.json().await.unwrap_or(Value::Null);

                if status.is_success() {
                    tracing::debug!("Token still valid");
                } else if body["code"] == "CREDENTIALS_UPDATED" {
                    discard_token(token_file);
                    forced_logout_notice(&body);
                    // Leave the notice on screen before handing control back.
                    tokio::time::sleep(Duration::from_secs(NOTICE_DELAY_SECONDS)).await;
                    return Err(SessionError::SessionTerminated);
                } else {
                    discard_token(token_file);
                    tracing::warn!(
                        "Session no longer valid ({}); log in again with `gg-cli admin login`",
                        body["code"].as_str().unwrap_or("rejected")
                    );
                    return Err(SessionError::SessionTerminated);
                }
            }
            // Transport failures are non-fatal at this one call site: do not
            // log the operator out because the network blipped.
            Err(e) => {
                tracing::warn!("Could not reach admin server ({e}); keeping token");
            }
        }

        tokio::time::sleep(Duration::from_secs(interval)).await;
    }
}

/// Read the stored token, if any.
fn read_token(token_file: &str) -> Option<String> {
    if !Path::new(token_file).exists() {
        return None;
    }
    std::fs::read_to_string(token_file)
        .ok()
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// Shape check: three non-empty dot-separated segments.
fn looks_like_token(token: &str) -> bool {
    let mut segments = 0;
    for segment in token.split('.') {
        if segment.is_empty() {
            return false;
        }
        segments += 1;
    }
    segments == 3
}

fn discard_token(token_file: &str) {
    if let Err(e) = std::fs::remove_file(token_file) {
        tracing::warn!("Could not remove token file {}: {}", token_file, e);
    }
}

/// The prominent, persistent notice for a forced logout — distinct from
/// ordinary session-expiry handling.
fn forced_logout_notice(body: &Value) {
    let reason = body["details"]["reason"]
        .as_str()
        .unwrap_or("credentials updated");
    let timestamp = body["details"]["timestamp"].as_str().unwrap_or("unknown");

    #[allow(clippy::print_stdout)]
    {
        println!();
        println!("==============================================================");
        println!("  YOUR ADMIN SESSION HAS BEEN TERMINATED");
        println!();
        println!("  Reason:    {reason}");
        println!("  Timestamp: {timestamp}");
        println!();
        println!("  Your credentials were changed by an operator. The stored");
        println!("  token has been discarded. Log in again with:");
        println!();
        println!("      gg-cli admin login");
        println!("==============================================================");
        println!();
    }
}
