//! Database access for Aura
//!
//! Shared SQLite schema initialization and row models. Per-entity query
//! modules live in the server crate.

pub mod init;
pub mod models;

pub use init::init_database;
