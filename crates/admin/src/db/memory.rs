//! In-memory credential store for tests.
//!
//! Mirrors the `PostgreSQL` store's semantics: case-insensitive email
//! uniqueness, `NotFound` on missing rows, and an unconditional
//! `updated_at` bump on every update.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;

use greengrocer_core::{AdminId, Email};

use super::{AdminStore, AdminUpdate, RepositoryError};
use crate::models::Admin;

#[derive(Debug, Clone)]
struct StoredAdmin {
    admin: Admin,
    password_hash: String,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: i32,
    rows: Vec<StoredAdmin>,
}

/// Test-only credential store backed by a mutex-guarded `Vec`.
#[derive(Debug, Clone, Default)]
pub struct MemoryAdminStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryAdminStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AdminStore for MemoryAdminStore {
    async fn get_by_id(&self, id: AdminId) -> Result<Option<Admin>, RepositoryError> {
        let inner = self.lock();
        Ok(inner
            .rows
            .iter()
            .find(|r| r.admin.id == id)
            .map(|r| r.admin.clone()))
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<Admin>, RepositoryError> {
        let inner = self.lock();
        Ok(inner
            .rows
            .iter()
            .find(|r| r.admin.email == *email)
            .map(|r| r.admin.clone()))
    }

    async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Admin, String)>, RepositoryError> {
        let inner = self.lock();
        Ok(inner
            .rows
            .iter()
            .find(|r| r.admin.email == *email)
            .map(|r| (r.admin.clone(), r.password_hash.clone())))
    }

    async fn list_all(&self) -> Result<Vec<Admin>, RepositoryError> {
        let inner = self.lock();
        let mut admins: Vec<Admin> = inner.rows.iter().map(|r| r.admin.clone()).collect();
        admins.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(admins)
    }

    async fn create(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
    ) -> Result<Admin, RepositoryError> {
        let mut inner = self.lock();
        if inner.rows.iter().any(|r| r.admin.email == *email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let admin = Admin {
            id: AdminId::new(inner.next_id),
            email: email.clone(),
            name: name.to_owned(),
            created_at: now,
            updated_at: now,
        };
        inner.rows.push(StoredAdmin {
            admin: admin.clone(),
            password_hash: password_hash.to_owned(),
        });
        Ok(admin)
    }

    async fn update(&self, id: AdminId, update: &AdminUpdate) -> Result<Admin, RepositoryError> {
        let mut inner = self.lock();

        if let Some(email) = &update.email
            && inner
                .rows
                .iter()
                .any(|r| r.admin.id != id && r.admin.email == *email)
        {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let row = inner
            .rows
            .iter_mut()
            .find(|r| r.admin.id == id)
            .ok_or(RepositoryError::NotFound)?;

        if let Some(name) = &update.name {
            row.admin.name.clone_from(name);
        }
        if let Some(email) = &update.email {
            row.admin.email = email.clone();
        }
        if let Some(hash) = &update.password_hash {
            row.password_hash.clone_from(hash);
        }
        row.admin.updated_at = Utc::now();

        Ok(row.admin.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_update_bumps_updated_at_without_field_changes() {
        let store = MemoryAdminStore::new();
        let email = Email::parse("owner@greengrocer.example").unwrap();
        let admin = store.create(&email, "Owner", "hash").await.unwrap();

        let updated = store
            .update(
                admin.id,
                &AdminUpdate {
                    name: Some("Owner".to_owned()),
                    ..AdminUpdate::default()
                },
            )
            .await
            .unwrap();

        assert!(updated.updated_at > admin.updated_at);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let store = MemoryAdminStore::new();
        let email = Email::parse("owner@greengrocer.example").unwrap();
        store.create(&email, "Owner", "hash").await.unwrap();

        let result = store.create(&email, "Other", "hash2").await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_email_of_other_admin() {
        let store = MemoryAdminStore::new();
        let a = Email::parse("a@greengrocer.example").unwrap();
        let b = Email::parse("b@greengrocer.example").unwrap();
        store.create(&a, "A", "hash").await.unwrap();
        let other = store.create(&b, "B", "hash").await.unwrap();

        let result = store
            .update(
                other.id,
                &AdminUpdate {
                    email: Some(a),
                    ..AdminUpdate::default()
                },
            )
            .await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }
}
