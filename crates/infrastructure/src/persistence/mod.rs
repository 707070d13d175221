//! Persistence module
//!
//! SQLite storage for weather readings, built on a shared sqlx pool.

pub mod async_connection;
pub mod database_health;
pub mod error;
pub mod reading_store;
pub mod schema;

pub use async_connection::{AsyncDatabase, AsyncDatabaseConfig, AsyncDatabaseError};
pub use database_health::SqliteDatabaseHealth;
pub use reading_store::SqliteReadingStore;
