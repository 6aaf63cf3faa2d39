//! # Aura Common Library
//!
//! Shared code for the Aura music backend:
//! - Database initialization, schema and row models
//! - Configuration resolution
//! - Password hashing and session token helpers
//! - Common error type

pub mod auth;
pub mod config;
pub mod db;
pub mod error;

pub use config::Config;
pub use error::{Error, Result};
