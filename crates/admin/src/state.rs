//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::db::AdminStore;
use crate::services::AdminAuthService;
use crate::session::SessionRegistry;
use crate::tokens::{TOKEN_TTL_SECONDS, TokenService};

/// Application state shared across all handlers.
///
/// Generic over the credential store so the HTTP surface can be driven
/// against an in-memory store in tests. Cloning is cheap (one `Arc`).
pub struct AppState<S> {
    inner: Arc<Inner<S>>,
}

struct Inner<S> {
    config: AdminConfig,
    store: S,
    registry: SessionRegistry,
    tokens: TokenService,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: AdminStore> AppState<S> {
    /// Build application state around a credential store.
    #[must_use]
    pub fn new(config: AdminConfig, store: S) -> Self {
        let tokens = TokenService::new(&config.token_secret, TOKEN_TTL_SECONDS);
        Self {
            inner: Arc::new(Inner {
                config,
                store,
                registry: SessionRegistry::new(),
                tokens,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.inner.store
    }

    #[must_use]
    pub fn registry(&self) -> &SessionRegistry {
        &self.inner.registry
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Authentication service over this state's store, registry, and keys.
    #[must_use]
    pub fn auth(&self) -> AdminAuthService<'_, S> {
        AdminAuthService::new(self.store(), self.registry(), self.tokens())
    }
}
