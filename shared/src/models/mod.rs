//! Data models
//!
//! Shared between event-server and its API consumers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod department;
pub mod registration;

// Re-exports
pub use department::*;
pub use registration::*;
