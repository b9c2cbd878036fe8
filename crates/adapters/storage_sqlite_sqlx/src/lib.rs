//! # givehub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the storage port traits defined in `givehub-app::ports`
//!   (`AutomationRepository`, `RunLogStore`)
//! - Manage the `SQLite` connection pool lifecycle
//! - Run database migrations (sqlx embedded migrations)
//! - Map between domain types and database rows (configs and stats are
//!   stored as JSON text columns)
//!
//! ## Dependency rule
//! Depends on `givehub-app` (for port traits) and `givehub-domain` (for
//! domain types). The `app` and `domain` crates must never reference
//! this adapter.

pub mod automation_repo;
pub mod error;
pub mod pool;
pub mod run_log_store;

pub use automation_repo::SqliteAutomationRepository;
pub use error::StorageError;
pub use pool::{Config, Database};
pub use run_log_store::SqliteRunLogStore;
