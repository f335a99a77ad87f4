//! Authentication extractor for admin routes.
//!
//! Runs the full token verification chain: transport extraction, signature
//! and expiry, admin marker, current credential record, force-logout flag,
//! freshness timestamp. Handlers that take [`RequireAdminAuth`] only ever
//! see verified identities.
//!
//! Transport precedence is deterministic: the `Authorization: Bearer`
//! header is checked before the `adminToken` cookie.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::db::AdminStore;
use crate::models::AdminIdentity;
use crate::services::auth::AuthRejection;
use crate::state::AppState;
use crate::tokens::TOKEN_TTL_SECONDS;

/// Cookie carrying the admin session token.
pub const ADMIN_TOKEN_COOKIE: &str = "adminToken";

/// Extractor that requires a verified admin session token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.name)
/// }
/// ```
pub struct RequireAdminAuth(pub AdminIdentity);

impl<S> FromRequestParts<AppState<S>> for RequireAdminAuth
where
    S: AdminStore,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts).ok_or(AuthRejection::NoToken)?;
        let identity = state.auth().authenticate(&token).await?;
        Ok(Self(identity))
    }
}

/// Pull the raw token out of the request: `Authorization: Bearer` first,
/// then the `adminToken` cookie.
fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(value) = parts.headers.get(header::AUTHORIZATION)
        && let Ok(value) = value.to_str()
        && let Some(token) = value.strip_prefix("Bearer ")
        && !token.is_empty()
    {
        return Some(token.to_owned());
    }

    for value in parts.headers.get_all(header::COOKIE) {
        let Ok(value) = value.to_str() else { continue };
        for pair in value.split(';') {
            if let Some((name, token)) = pair.trim().split_once('=')
                && name == ADMIN_TOKEN_COOKIE
                && !token.is_empty()
            {
                return Some(token.to_owned());
            }
        }
    }

    None
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = match &self {
            Self::CredentialsUpdated { reason, timestamp } => json!({
                "success": false,
                "code": self.code(),
                "message": self.to_string(),
                "details": {
                    "reason": reason,
                    "timestamp": timestamp,
                },
            }),
            _ => json!({
                "success": false,
                "code": self.code(),
                "message": self.to_string(),
            }),
        };

        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// Build the `Set-Cookie` value handing the token to the client.
///
/// HttpOnly + SameSite=Strict, lifetime matching the token's expiry.
#[must_use]
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{ADMIN_TOKEN_COOKIE}={token}; Path=/; HttpOnly; SameSite=Strict; Max-Age={TOKEN_TTL_SECONDS}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the `Set-Cookie` value that discards the token (logout).
#[must_use]
pub fn clear_session_cookie() -> String {
    format!("{ADMIN_TOKEN_COOKIE}=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0")
}
