//! Authentication error types.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::db::RepositoryError;

/// Errors from login, logout, and credential-edit operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] greengrocer_core::EmailError),

    /// Invalid credentials (wrong password or unknown admin).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account is flagged for forced logout; login must not hand out a
    /// new token until an explicit logout clears the flag.
    #[error("credentials updated; log in again after logging out")]
    CredentialsUpdated,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Admin record not found.
    #[error("admin not found")]
    AdminNotFound,

    /// Email already used by another admin.
    #[error("email already in use")]
    EmailTaken,

    /// An edit with no fields to apply.
    #[error("no fields to update")]
    EmptyEdit,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token signing error.
    #[error("token signing failed")]
    TokenIssue,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Why a token was rejected by the verifier.
///
/// All variants are terminal for the request; none are retried server-side.
/// `CredentialsUpdated` is the only one with a distinct machine-readable
/// code, so clients can tell "your credentials changed, log in again" apart
/// from an ordinary expired session.
#[derive(Debug, Error)]
pub enum AuthRejection {
    /// No token in the Authorization header or the `adminToken` cookie.
    #[error("no token provided")]
    NoToken,

    /// Bad signature, malformed, or expired.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The token lacks the admin marker.
    #[error("not an admin token")]
    NotAdmin,

    /// No credential record for the token's admin ID (covers deleted admins).
    #[error("admin not found")]
    AdminNotFound,

    /// The admin's credentials changed after this token was issued, or the
    /// identity is flagged for forced logout.
    #[error("credentials updated: {reason}")]
    CredentialsUpdated {
        /// Human-readable cause, returned in the response details.
        reason: &'static str,
        /// When the invalidating change happened.
        timestamp: DateTime<Utc>,
    },

    /// The credential store could not be reached. Fail closed.
    #[error("authentication unavailable")]
    Unavailable,
}

impl AuthRejection {
    /// Machine-readable code for the response body.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoToken => "NO_TOKEN",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::NotAdmin => "NOT_ADMIN",
            Self::AdminNotFound => "ADMIN_NOT_FOUND",
            Self::CredentialsUpdated { .. } => "CREDENTIALS_UPDATED",
            Self::Unavailable => "UNAUTHORIZED",
        }
    }
}
