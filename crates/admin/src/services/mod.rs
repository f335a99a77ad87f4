//! Domain services for the admin session API.

pub mod auth;

pub use auth::AdminAuthService;
