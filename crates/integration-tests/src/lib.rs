//! Integration tests for Greengrocer.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! gg-cli migrate
//!
//! # Start the admin server
//! cargo run -p greengrocer-admin
//!
//! # Run integration tests
//! cargo test -p greengrocer-integration-tests -- --ignored
//! ```
//!
//! Tests talk to a running server over HTTP; they are `#[ignore]`d by
//! default so `cargo test` stays self-contained.

use reqwest::Client;

/// Shared context for integration tests.
pub struct TestContext {
    /// HTTP client with a cookie store, so `Set-Cookie` flows are exercised.
    pub client: Client,
    /// Base URL of the running admin server.
    pub admin_url: String,
}

impl TestContext {
    /// Build a context from the environment.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be constructed.
    #[must_use]
    pub fn new() -> Self {
        let admin_url = std::env::var("ADMIN_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:4001".to_string());
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, admin_url }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
