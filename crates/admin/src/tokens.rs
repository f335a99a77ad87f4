//! Admin session tokens — issue and verify.
//!
//! Tokens are signed bearer credentials with a 24 hour expiry. Besides the
//! admin's identity they embed `cred_ts`, the credential record's
//! `updated_at` at issuance time (microseconds since epoch). The verifier
//! compares that value against the current record, which is what keeps a
//! token revocable across process restarts: the in-memory force-logout flag
//! can be lost, the timestamp comparison cannot.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Admin;

/// Token lifetime in seconds (24 hours).
pub const TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;

/// Errors from token signing or verification.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signing or decoding failed (bad signature, expired, malformed).
    #[error("token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Claims embedded in every admin session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the admin's database ID, as a string.
    pub sub: String,
    /// Display name at issuance time. Informational only; the verifier
    /// always returns the freshly loaded record's name.
    pub name: String,
    /// Admin marker. Tokens without it are rejected before any lookup.
    #[serde(default)]
    pub admin: bool,
    /// Credential `updated_at` at issuance (microseconds since epoch).
    pub cred_ts: i64,
    /// Issued at (unix timestamp, seconds).
    pub iat: i64,
    /// Expiration (unix timestamp, seconds).
    pub exp: i64,
}

/// Token service — holds the signing keys and validation settings.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: i64,
}

impl TokenService {
    /// Create a token service from an HMAC secret.
    #[must_use]
    pub fn new(secret: &SecretString, ttl_seconds: i64) -> Self {
        let secret = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::default(),
            ttl_seconds,
        }
    }

    /// Issue a signed session token for an admin.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Jwt`] if signing fails.
    pub fn issue(&self, admin: &Admin) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: admin.id.to_string(),
            name: admin.name.clone(),
            admin: true,
            cred_ts: admin.updated_at.timestamp_micros(),
            iat: now,
            exp: now + self.ttl_seconds,
        };
        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Verify a token's signature and expiry and extract its claims.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Jwt`] if the token is malformed, tampered
    /// with, or expired.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use greengrocer_core::{AdminId, Email};

    use super::*;

    fn test_admin() -> Admin {
        let now = Utc::now();
        Admin {
            id: AdminId::new(3),
            email: Email::parse("owner@greengrocer.example").unwrap(),
            name: "Olive Owner".to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    fn test_service(ttl_seconds: i64) -> TokenService {
        TokenService::new(&SecretString::from("unit-test-signing-key"), ttl_seconds)
    }

    #[test]
    fn test_issue_and_verify() {
        let svc = test_service(TOKEN_TTL_SECONDS);
        let admin = test_admin();

        let token = svc.issue(&admin).unwrap();
        let claims = svc.verify(&token).unwrap();

        assert_eq!(claims.sub, "3");
        assert_eq!(claims.name, "Olive Owner");
        assert!(claims.admin);
        assert_eq!(claims.cred_ts, admin.updated_at.timestamp_micros());
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECONDS);
    }

    #[test]
    fn test_verify_garbage_rejected() {
        let svc = test_service(TOKEN_TTL_SECONDS);
        assert!(svc.verify("not.a.token").is_err());
    }

    #[test]
    fn test_verify_wrong_secret_rejected() {
        let issuer = TokenService::new(&SecretString::from("signing-key-a"), 3600);
        let verifier = TokenService::new(&SecretString::from("signing-key-b"), 3600);

        let token = issuer.issue(&test_admin()).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_verify_expired_rejected() {
        // Expired 2 minutes ago, past the default 60s leeway.
        let svc = test_service(-120);
        let token = svc.issue(&test_admin()).unwrap();
        assert!(svc.verify(&token).is_err());
    }

    #[test]
    fn test_missing_admin_marker_defaults_false() {
        // A token minted without the marker must deserialize as admin=false.
        #[derive(serde::Serialize)]
        struct BareClaims {
            sub: String,
            name: String,
            cred_ts: i64,
            iat: i64,
            exp: i64,
        }

        let now = Utc::now().timestamp();
        let bare = BareClaims {
            sub: "3".to_owned(),
            name: "Olive Owner".to_owned(),
            cred_ts: 0,
            iat: now,
            exp: now + 3600,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &bare,
            &EncodingKey::from_secret(b"unit-test-signing-key"),
        )
        .unwrap();

        let svc = test_service(3600);
        let claims = svc.verify(&token).unwrap();
        assert!(!claims.admin);
    }
}
