//! In-process session registry for forced logout.
//!
//! Tracks one entry per admin: when their most recent token was issued and
//! whether a credential edit has marked the identity for forced logout. The
//! registry is the volatile half of invalidation; the durable half is the
//! freshness timestamp embedded in every token. Entries do not survive a
//! process restart.
//!
//! The map is mutex-guarded because logins, credential edits, and the
//! poller's validation calls can touch the same entry from concurrent
//! request handlers. Every operation is a single short critical section.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use greengrocer_core::AdminId;

/// Per-admin session tracking record.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    /// Admin this entry belongs to.
    pub admin_id: AdminId,
    /// When the most recently tracked token was issued.
    pub issued_at: DateTime<Utc>,
    /// Whether all outstanding tokens for this admin must be rejected.
    pub force_logout: bool,
    /// When `force_logout` was last set.
    pub logout_time: Option<DateTime<Utc>>,
}

/// Registry of live admin sessions, keyed by admin ID.
///
/// Owned by the application state and passed by reference; never a
/// module-level global.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    entries: Mutex<HashMap<AdminId, SessionEntry>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<AdminId, SessionEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create or refresh the entry for a login.
    ///
    /// A pre-existing `force_logout` flag is preserved, not cleared: editing
    /// credentials poisons the identity until an explicit logout. Returns
    /// the flag's value so the login flow can refuse to hand out the new
    /// token when it is set.
    pub fn track(&self, admin_id: AdminId, issued_at: DateTime<Utc>) -> bool {
        let mut entries = self.lock();
        let entry = entries.entry(admin_id).or_insert(SessionEntry {
            admin_id,
            issued_at,
            force_logout: false,
            logout_time: None,
        });
        entry.issued_at = issued_at;
        entry.force_logout
    }

    /// Delete the entry (explicit logout).
    pub fn remove(&self, admin_id: AdminId) {
        self.lock().remove(&admin_id);
    }

    /// Mark an admin for forced logout, creating the entry if none exists
    /// (a credential edit can run before any login).
    ///
    /// Returns whether an already-tracked session existed — operator
    /// feedback only, behavior does not depend on it.
    pub fn mark_force_logout(&self, admin_id: AdminId) -> bool {
        let now = Utc::now();
        let mut entries = self.lock();
        match entries.get_mut(&admin_id) {
            Some(entry) => {
                entry.force_logout = true;
                entry.logout_time = Some(now);
                true
            }
            None => {
                entries.insert(
                    admin_id,
                    SessionEntry {
                        admin_id,
                        issued_at: now,
                        force_logout: true,
                        logout_time: Some(now),
                    },
                );
                false
            }
        }
    }

    /// Whether the admin is currently flagged for forced logout.
    #[must_use]
    pub fn is_flagged(&self, admin_id: AdminId) -> bool {
        self.lock().get(&admin_id).is_some_and(|e| e.force_logout)
    }

    /// When the admin was flagged, if they are.
    #[must_use]
    pub fn flagged_at(&self, admin_id: AdminId) -> Option<DateTime<Utc>> {
        self.lock()
            .get(&admin_id)
            .filter(|e| e.force_logout)
            .and_then(|e| e.logout_time)
    }

    /// Clear the forced-logout flag. Called only from a processed logout.
    pub fn clear_flag(&self, admin_id: AdminId) {
        if let Some(entry) = self.lock().get_mut(&admin_id) {
            entry.force_logout = false;
            entry.logout_time = None;
        }
    }

    /// Read-only snapshot of all entries, for diagnostics.
    #[must_use]
    pub fn list(&self) -> Vec<SessionEntry> {
        let mut entries: Vec<SessionEntry> = self.lock().values().cloned().collect();
        entries.sort_by_key(|e| e.admin_id.as_i32());
        entries
    }
}
