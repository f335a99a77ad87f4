//! Greengrocer Admin library.
//!
//! The admin session API as a library, so the CLI can reuse the domain
//! services and the HTTP surface can be tested in-process.
//!
//! # Architecture
//!
//! - Axum web framework, JSON request/response bodies
//! - `PostgreSQL` credential store behind the [`db::AdminStore`] trait
//! - Signed bearer tokens (24 h) carrying a credential-freshness timestamp
//! - In-process [`session::SessionRegistry`] for forced logout
//!
//! Editing an admin's credentials bumps the record's freshness timestamp
//! and flags the identity in the registry; the next verification of any
//! token issued before the edit fails with a distinct
//! `CREDENTIALS_UPDATED` code, and login stays blocked until an explicit
//! logout clears the flag.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod tokens;
