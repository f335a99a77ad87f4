//! `PostgreSQL`-backed credential store.
//!
//! Queries use the runtime-checked sqlx API with explicit row types and
//! `TryFrom` conversions into domain types.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use greengrocer_core::{AdminId, Email};

use super::{AdminStore, AdminUpdate, RepositoryError};
use crate::models::Admin;

/// Internal row type for admin queries.
#[derive(Debug, sqlx::FromRow)]
struct AdminRow {
    id: i32,
    email: String,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AdminRow> for Admin {
    type Error = RepositoryError;

    fn try_from(row: AdminRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: AdminId::new(row.id),
            email,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Internal row type for login lookups (carries the password hash).
#[derive(Debug, sqlx::FromRow)]
struct AdminAuthRow {
    id: i32,
    email: String,
    name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AdminAuthRow> for (Admin, String) {
    type Error = RepositoryError;

    fn try_from(row: AdminAuthRow) -> Result<Self, Self::Error> {
        let admin = AdminRow {
            id: row.id,
            email: row.email,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
        .try_into()?;

        Ok((admin, row.password_hash))
    }
}

const ADMIN_COLUMNS: &str = "id, email, name, created_at, updated_at";

/// `PostgreSQL` credential store.
#[derive(Clone)]
pub struct PgAdminStore {
    pool: PgPool,
}

impl PgAdminStore {
    /// Create a new store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool (for readiness probes).
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl AdminStore for PgAdminStore {
    async fn get_by_id(&self, id: AdminId) -> Result<Option<Admin>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admin_user WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<Admin>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admin_user WHERE LOWER(email) = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Admin, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminAuthRow>(
            "SELECT id, email, name, password_hash, created_at, updated_at \
             FROM admin_user WHERE LOWER(email) = $1",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Admin>, RepositoryError> {
        let rows = sqlx::query_as::<_, AdminRow>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admin_user ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn create(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
    ) -> Result<Admin, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(&format!(
            "INSERT INTO admin_user (email, name, password_hash) \
             VALUES ($1, $2, $3) \
             RETURNING {ADMIN_COLUMNS}"
        ))
        .bind(email.as_str())
        .bind(name)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    async fn update(&self, id: AdminId, update: &AdminUpdate) -> Result<Admin, RepositoryError> {
        // updated_at is bumped unconditionally: any edit invalidates every
        // token issued before it, whichever field changed.
        let row = sqlx::query_as::<_, AdminRow>(&format!(
            "UPDATE admin_user \
             SET name = COALESCE($2, name), \
                 email = COALESCE($3, email), \
                 password_hash = COALESCE($4, password_hash), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {ADMIN_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(update.name.as_deref())
        .bind(update.email.as_ref().map(Email::as_str))
        .bind(update.password_hash.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?
        .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }
}
