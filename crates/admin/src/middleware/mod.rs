//! HTTP middleware and extractors for the admin API.

pub mod auth;

pub use auth::{ADMIN_TOKEN_COOKIE, RequireAdminAuth, clear_session_cookie, session_cookie};
