//! Admin domain types.
//!
//! These types represent validated domain objects for admin authentication.
//! Password hashes are deliberately absent: they never leave the db layer
//! except through the dedicated password-check lookup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use greengrocer_core::{AdminId, Email};

/// An admin credential record (domain type).
#[derive(Debug, Clone)]
pub struct Admin {
    /// Unique admin ID.
    pub id: AdminId,
    /// Admin's email address (normalized lowercase).
    pub email: Email,
    /// Admin's display name.
    pub name: String,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When email, name, or password was last changed. Every outstanding
    /// token embeds this value at issuance; bumping it invalidates them all.
    pub updated_at: DateTime<Utc>,
}

/// The authenticated identity attached to a request after verification.
///
/// Name and email come from the freshly loaded record, not the token, so a
/// verified request always sees current values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminIdentity {
    /// Admin's database ID.
    pub id: AdminId,
    /// Admin's email address.
    pub email: Email,
    /// Admin's display name.
    pub name: String,
}

impl From<&Admin> for AdminIdentity {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            email: admin.email.clone(),
            name: admin.name.clone(),
        }
    }
}

/// A partial credential edit. Only the provided fields are applied; any
/// successful edit bumps `updated_at` regardless of which fields changed.
#[derive(Debug, Clone, Default)]
pub struct CredentialChanges {
    /// New display name.
    pub name: Option<String>,
    /// New email address (validated and checked for uniqueness).
    pub email: Option<String>,
    /// New plaintext password (hashed before storage).
    pub password: Option<String>,
}

impl CredentialChanges {
    /// Whether the edit contains any field at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none()
    }
}
