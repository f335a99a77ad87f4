//! Greengrocer Core - Shared types library.
//!
//! This crate provides common types used across all Greengrocer components:
//! - `admin` - Internal admin session API
//! - `cli` - Command-line tools for migrations and admin management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and email addresses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
