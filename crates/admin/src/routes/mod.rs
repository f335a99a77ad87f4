//! HTTP route handlers for the admin API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check (wired in main)
//! GET  /health/ready           - Readiness check (wired in main)
//!
//! # Sessions
//! POST /admin/login            - Password login, returns token + cookie
//! POST /admin/logout           - Clear session entry and cookie
//! GET  /admin/validate-token   - Re-verify the presented token
//! ```

pub mod auth;

use axum::{
    Router,
    routing::{get, post},
};

use crate::db::AdminStore;
use crate::state::AppState;

/// Build the admin API router.
pub fn router<S: AdminStore>() -> Router<AppState<S>> {
    Router::new()
        .route("/admin/login", post(auth::login::<S>))
        .route("/admin/logout", post(auth::logout::<S>))
        .route("/admin/validate-token", get(auth::validate_token))
}
