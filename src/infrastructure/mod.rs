//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Database: SQLite-backed host
//! - Storage: In-memory host
//! - Adapters: Event sources and message delivery (console)
//! - Host: Setting registration and wiring of the collaborators

pub mod config;
pub mod database;
pub mod storage;
pub mod adapters;
pub mod host;
