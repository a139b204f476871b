//! SurrealDB integration: the remote store for jobs and bays.
//!
//! This crate provides database connectivity, repositories for the
//! two collections, and live-query subscriptions that signal every
//! remote mutation.
//!
//! # Features
//!
//! - `memory` (default): in-memory storage for testing
//! - `rocksdb`: persistent file-based storage

mod connection;
mod live;
mod schema;
pub mod repositories;

pub use connection::{Database, DbConfig, DbError, get_db, init_db};
pub use live::{BaysSubscription, JobsSubscription};
pub use schema::init_schema;

/// Initialize the database with the given configuration.
///
/// This should be called once at application startup.
pub async fn init(config: DbConfig) -> Result<(), DbError> {
    init_db(config).await?;
    init_schema().await?;
    Ok(())
}
