//! Domain models for the admin session service.

pub mod admin;

pub use admin::{Admin, AdminIdentity, CredentialChanges};
