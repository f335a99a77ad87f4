//! Admin credential management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a new admin credential record
//! gg-cli admin create -e owner@greengrocer.example -n "Olive Owner" -p <password>
//!
//! # List records (selection input for edit)
//! gg-cli admin list
//!
//! # Apply a partial edit; any edit invalidates the admin's sessions
//! gg-cli admin edit -i 1 --email neworner@greengrocer.example
//! ```
//!
//! # Environment Variables
//!
//! Reads the full server configuration (`ADMIN_DATABASE_URL`,
//! `ADMIN_TOKEN_SECRET`, `ADMIN_BASE_URL`) — these commands are meant to
//! run on the box that hosts the server, with the same `.env`.

use thiserror::Error;

use greengrocer_admin::config::{AdminConfig, ConfigError};
use greengrocer_admin::db::{self, PgAdminStore};
use greengrocer_admin::models::CredentialChanges;
use greengrocer_admin::services::AdminAuthService;
use greengrocer_admin::services::auth::AuthError;
use greengrocer_admin::session::SessionRegistry;
use greengrocer_admin::tokens::{TOKEN_TTL_SECONDS, TokenService};
use greengrocer_core::AdminId;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Configuration loading failed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Domain operation failed (validation, uniqueness, missing record).
    #[error("{0}")]
    Auth(#[from] AuthError),
}

struct Context {
    store: PgAdminStore,
    registry: SessionRegistry,
    tokens: TokenService,
}

impl Context {
    async fn connect() -> Result<Self, AdminError> {
        let config = AdminConfig::from_env()?;

        tracing::info!("Connecting to admin database...");
        let pool = db::create_pool(&config.database_url).await?;

        Ok(Self {
            store: PgAdminStore::new(pool),
            registry: SessionRegistry::new(),
            tokens: TokenService::new(&config.token_secret, TOKEN_TTL_SECONDS),
        })
    }

    fn auth(&self) -> AdminAuthService<'_, PgAdminStore> {
        AdminAuthService::new(&self.store, &self.registry, &self.tokens)
    }
}

/// Create a new admin credential record.
///
/// # Arguments
///
/// * `email` - Admin's email address
/// * `name` - Admin's display name
/// * `password` - Admin's password (min 8 characters)
///
/// # Returns
///
/// The ID of the created admin.
///
/// # Errors
///
/// Returns `AdminError` if configuration or the database is unavailable, or
/// if validation fails (bad email, weak password, taken email).
pub async fn create_user(email: &str, name: &str, password: &str) -> Result<i32, AdminError> {
    let ctx = Context::connect().await?;

    tracing::info!("Creating admin: {} ({})", email, name);
    let admin = ctx.auth().create_admin(email, name, password).await?;

    tracing::info!(
        "Admin created successfully! ID: {}, Email: {}, Name: {}",
        admin.id,
        admin.email,
        admin.name
    );

    Ok(admin.id.as_i32())
}

/// List all admin credential records.
///
/// # Errors
///
/// Returns `AdminError` if configuration or the database is unavailable.
pub async fn list() -> Result<(), AdminError> {
    use greengrocer_admin::db::AdminStore;

    let ctx = Context::connect().await?;
    let admins = ctx.store.list_all().await.map_err(AuthError::Repository)?;

    if admins.is_empty() {
        tracing::info!("No admins found. Create one with: gg-cli admin create");
        return Ok(());
    }

    tracing::info!("{} admin(s):", admins.len());
    for admin in admins {
        tracing::info!(
            "  #{} {} <{}> (updated {})",
            admin.id,
            admin.name,
            admin.email,
            admin.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    Ok(())
}

/// Edit an admin's credentials.
///
/// Applies only the provided fields, bumps the record's freshness
/// timestamp, and marks the identity for forced logout. Every token issued
/// before this call is invalid afterwards, and the admin cannot log back
/// in until a logout is processed for them.
///
/// # Errors
///
/// Returns `AdminError` if nothing was provided to change, the record is
/// missing, the email is taken, or the infrastructure is unavailable.
pub async fn edit(
    id: i32,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<(), AdminError> {
    let ctx = Context::connect().await?;
    let id = AdminId::new(id);

    let changes = CredentialChanges {
        name,
        email,
        password,
    };

    tracing::info!("Editing admin #{}...", id);
    let outcome = ctx.auth().edit_credential(id, changes).await?;

    tracing::info!("Admin updated successfully!");
    tracing::info!("  ID: {}", outcome.admin.id);
    tracing::info!("  Email: {}", outcome.admin.email);
    tracing::info!("  Name: {}", outcome.admin.name);
    tracing::info!("  Updated: {}", outcome.admin.updated_at);
    tracing::info!(
        "  Active session in this process: {}",
        if outcome.had_active_session { "yes" } else { "no" }
    );
    tracing::info!("");
    tracing::info!(
        "All tokens issued before this edit are now invalid: a running server \
         rejects them on the next validation via the bumped timestamp."
    );

    Ok(())
}
