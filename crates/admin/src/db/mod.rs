//! Database access for the admin session service.
//!
//! # Database: `greengrocer_admin`
//!
//! ## Tables
//!
//! - `admin_user` - Admin credential records (email, name, password hash,
//!   freshness timestamp)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p greengrocer-cli -- migrate
//! ```
//!
//! The credential store is a trait ([`AdminStore`]) so the session and
//! verification semantics can be exercised against an in-memory store in
//! tests; [`postgres::PgAdminStore`] is the production implementation.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use std::future::Future;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use greengrocer_core::{AdminId, Email};

use crate::models::Admin;

pub use postgres::PgAdminStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// A validated, ready-to-persist credential update.
///
/// Fields are `None` when untouched. The store bumps `updated_at` on every
/// update regardless of which fields are present.
#[derive(Debug, Clone, Default)]
pub struct AdminUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New (normalized) email address.
    pub email: Option<Email>,
    /// New password hash.
    pub password_hash: Option<String>,
}

/// Persistence seam for admin credential records.
///
/// Methods return `impl Future + Send` so generic request handlers stay
/// `Send`; implementations just write `async fn`.
pub trait AdminStore: Send + Sync + 'static {
    /// Load an admin by ID.
    fn get_by_id(
        &self,
        id: AdminId,
    ) -> impl Future<Output = Result<Option<Admin>, RepositoryError>> + Send;

    /// Load an admin by normalized email.
    fn get_by_email(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Option<Admin>, RepositoryError>> + Send;

    /// Load an admin together with their password hash, for login checks.
    fn get_password_hash(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Option<(Admin, String)>, RepositoryError>> + Send;

    /// List all admins, newest first.
    fn list_all(&self) -> impl Future<Output = Result<Vec<Admin>, RepositoryError>> + Send;

    /// Create a new admin record.
    ///
    /// Fails with [`RepositoryError::Conflict`] if the email is taken.
    fn create(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
    ) -> impl Future<Output = Result<Admin, RepositoryError>> + Send;

    /// Apply a partial update and bump `updated_at` unconditionally.
    ///
    /// Fails with [`RepositoryError::NotFound`] if the admin doesn't exist
    /// and [`RepositoryError::Conflict`] if the new email is taken.
    fn update(
        &self,
        id: AdminId,
        update: &AdminUpdate,
    ) -> impl Future<Output = Result<Admin, RepositoryError>> + Send;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
