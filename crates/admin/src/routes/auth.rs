//! Session route handlers: login, logout, token validation.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::db::AdminStore;
use crate::error::AppError;
use crate::middleware::{RequireAdminAuth, clear_session_cookie, session_cookie};
use crate::models::AdminIdentity;
use crate::services::auth::AuthError;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

/// Password login.
///
/// POST /admin/login
///
/// On success, returns the token in the body and sets the HTTP-only
/// `adminToken` cookie. A correct password for a force-logged-out identity
/// is still rejected with `CREDENTIALS_UPDATED` until a logout clears the
/// flag.
pub async fn login<S: AdminStore>(
    State(state): State<AppState<S>>,
    Json(req): Json<LoginRequest>,
) -> Response {
    match state.auth().login(&req.email, &req.password).await {
        Ok(outcome) => {
            let secure = state.config().base_url.starts_with("https://");
            let cookie = session_cookie(&outcome.token, secure);
            tracing::info!(admin_id = %outcome.admin.id, "admin logged in");
            (
                StatusCode::OK,
                [(header::SET_COOKIE, cookie)],
                Json(json!({
                    "success": true,
                    "admin": AdminIdentity::from(&outcome.admin),
                    "token": outcome.token,
                })),
            )
                .into_response()
        }
        Err(AuthError::CredentialsUpdated) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "success": false,
                "code": "CREDENTIALS_UPDATED",
                "message": "credentials updated; log out and log in again",
            })),
        )
            .into_response(),
        Err(AuthError::InvalidCredentials | AuthError::InvalidEmail(_)) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "success": false,
                "message": "invalid email or password",
            })),
        )
            .into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Logout: drop the session entry (and its flag) and clear the cookie.
///
/// POST /admin/logout
///
/// Succeeds even when no registry entry existed.
pub async fn logout<S: AdminStore>(
    State(state): State<AppState<S>>,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> Response {
    state.auth().logout(admin.id);
    tracing::info!(admin_id = %admin.id, "admin logged out");
    (
        StatusCode::OK,
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(json!({ "success": true })),
    )
        .into_response()
}

/// Re-verify the presented token.
///
/// GET /admin/validate-token
///
/// The poller hits this every few seconds; rejection payloads carry the
/// machine-readable code the client switches on.
pub async fn validate_token(RequireAdminAuth(admin): RequireAdminAuth) -> Response {
    Json(json!({
        "success": true,
        "admin": admin,
    }))
    .into_response()
}
