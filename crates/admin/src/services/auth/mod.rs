//! Admin authentication service.
//!
//! Password login, token verification, and the credential-edit path that
//! forces outstanding sessions to terminate. Two mechanisms cooperate:
//!
//! - the [`SessionRegistry`] force-logout flag, volatile, checked on every
//!   verification and at login;
//! - the `cred_ts` freshness claim embedded in each token, durable, compared
//!   against the record's current `updated_at`.
//!
//! An edit bumps the timestamp and sets the flag; either one is sufficient
//! to reject a stale token.

mod error;

pub use error::{AuthError, AuthRejection};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;

use greengrocer_core::{AdminId, Email};

use crate::db::{AdminStore, AdminUpdate, RepositoryError};
use crate::models::{Admin, AdminIdentity, CredentialChanges};
use crate::session::{SessionEntry, SessionRegistry};
use crate::tokens::TokenService;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// A successful login: the admin record and their freshly signed token.
#[derive(Debug)]
pub struct LoginOutcome {
    /// The authenticated admin.
    pub admin: Admin,
    /// Signed session token to hand to the client.
    pub token: String,
}

/// A successful credential edit.
#[derive(Debug)]
pub struct EditOutcome {
    /// The updated record.
    pub admin: Admin,
    /// Whether an already-tracked session existed when the flag was set.
    /// Operator feedback only.
    pub had_active_session: bool,
}

/// Admin authentication service.
///
/// Borrows the store, registry, and token service from the application
/// state; construct one per operation.
pub struct AdminAuthService<'a, S> {
    store: &'a S,
    registry: &'a SessionRegistry,
    tokens: &'a TokenService,
}

impl<'a, S: AdminStore> AdminAuthService<'a, S> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a S, registry: &'a SessionRegistry, tokens: &'a TokenService) -> Self {
        Self {
            store,
            registry,
            tokens,
        }
    }

    /// Create a new admin credential record.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn create_admin(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<Admin, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let admin = self
            .store
            .create(&email, name, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(admin)
    }

    /// Login with email and password.
    ///
    /// Issuance and tracking are coupled: the login is registered with the
    /// session registry, and if the identity is still flagged for forced
    /// logout the operation is rejected instead of returning a token. An
    /// edited admin cannot silently re-establish a session until an
    /// explicit logout clears the flag.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::CredentialsUpdated` if the identity is flagged.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let email = Email::parse(email)?;

        let (admin, password_hash) = self
            .store
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        if self.registry.track(admin.id, Utc::now()) {
            return Err(AuthError::CredentialsUpdated);
        }

        let token = self.tokens.issue(&admin).map_err(|e| {
            tracing::error!(error = %e, admin_id = %admin.id, "failed to sign session token");
            AuthError::TokenIssue
        })?;

        Ok(LoginOutcome { admin, token })
    }

    /// Process a logout: clear the forced-logout flag and drop the entry.
    ///
    /// Succeeds whether or not an entry existed.
    pub fn logout(&self, admin_id: AdminId) {
        self.registry.clear_flag(admin_id);
        self.registry.remove(admin_id);
    }

    /// Verify a raw token and resolve the identity it belongs to.
    ///
    /// Signature and expiry first, then the admin marker, then the current
    /// credential record, then the force-logout flag, then the freshness
    /// timestamp. The returned identity carries the record's current name
    /// and email, not the token's embedded copies.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthRejection`] naming the first failed check. Store
    /// errors reject with `Unavailable` — never admit on failure.
    pub async fn authenticate(&self, raw_token: &str) -> Result<AdminIdentity, AuthRejection> {
        let claims = self
            .tokens
            .verify(raw_token)
            .map_err(|_| AuthRejection::InvalidToken)?;

        if !claims.admin {
            return Err(AuthRejection::NotAdmin);
        }

        let id: AdminId = claims.sub.parse().map_err(|_| AuthRejection::InvalidToken)?;

        let admin = match self.store.get_by_id(id).await {
            Ok(Some(admin)) => admin,
            Ok(None) => return Err(AuthRejection::AdminNotFound),
            Err(e) => {
                tracing::error!(error = %e, admin_id = %id, "credential lookup failed during token verification");
                return Err(AuthRejection::Unavailable);
            }
        };

        if self.registry.is_flagged(id) {
            let timestamp = self.registry.flagged_at(id).unwrap_or(admin.updated_at);
            return Err(AuthRejection::CredentialsUpdated {
                reason: "session terminated by a credential update",
                timestamp,
            });
        }

        if claims.cred_ts < admin.updated_at.timestamp_micros() {
            return Err(AuthRejection::CredentialsUpdated {
                reason: "credentials changed after this token was issued",
                timestamp: admin.updated_at,
            });
        }

        Ok(AdminIdentity::from(&admin))
    }

    /// Apply a partial credential edit and force the session to terminate.
    ///
    /// Only provided fields are applied, but `updated_at` is bumped on any
    /// successful edit — even a name-only change invalidates all
    /// outstanding tokens. After the update the identity is marked for
    /// forced logout; this call is the mechanism's entire enforcement
    /// point.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmptyEdit` if no fields were provided,
    /// `AuthError::EmailTaken` if the email belongs to another admin, and
    /// `AuthError::AdminNotFound` if the record doesn't exist.
    pub async fn edit_credential(
        &self,
        id: AdminId,
        changes: CredentialChanges,
    ) -> Result<EditOutcome, AuthError> {
        if changes.is_empty() {
            return Err(AuthError::EmptyEdit);
        }

        let mut update = AdminUpdate {
            name: changes.name,
            ..AdminUpdate::default()
        };

        if let Some(email) = changes.email.as_deref() {
            let email = Email::parse(email)?;
            // Checked up front for a clear error; the unique index backstops races.
            if let Some(existing) = self.store.get_by_email(&email).await?
                && existing.id != id
            {
                return Err(AuthError::EmailTaken);
            }
            update.email = Some(email);
        }

        if let Some(password) = changes.password.as_deref() {
            validate_password(password)?;
            update.password_hash = Some(hash_password(password)?);
        }

        let admin = self
            .store
            .update(id, &update)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::AdminNotFound,
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        let had_active_session = self.registry.mark_force_logout(id);

        tracing::info!(
            admin_id = %id,
            had_active_session,
            "credential edit applied; outstanding sessions invalidated"
        );

        Ok(EditOutcome {
            admin,
            had_active_session,
        })
    }

    /// Read-only snapshot of tracked sessions, for diagnostics.
    #[must_use]
    pub fn sessions(&self) -> Vec<SessionEntry> {
        self.registry.list()
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
