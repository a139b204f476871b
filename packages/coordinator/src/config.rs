//! Coordinator configuration.

use std::time::Duration;

use db::DbConfig;
use storage::{StorageConfig, StorageError};

/// How often the local snapshot is polled for sibling-process writes
/// when no better change signal exists.
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_secs(2);

/// Configuration for a [`crate::Garage`].
#[derive(Debug, Clone)]
pub struct GarageConfig {
    /// Remote store to bridge to. `None` means no remote store was
    /// ever configured and the coordinator starts straight in
    /// local-fallback mode.
    pub db: Option<DbConfig>,
    /// Local snapshot store used in fallback mode.
    pub storage: StorageConfig,
    /// Poll interval of the local snapshot watcher.
    pub watch_interval: Duration,
}

impl GarageConfig {
    /// Build from environment variables.
    ///
    /// - `AUTOFLOW_DB_ENDPOINT` (+ the other `AUTOFLOW_DB_*` vars)
    ///   selects the remote store; unset means local-only
    /// - `AUTOFLOW_STORAGE_BACKEND` / `AUTOFLOW_STORAGE_ROOT` select
    ///   the local store
    /// - `AUTOFLOW_WATCH_SECS` overrides the watcher interval
    pub fn from_env() -> Result<Self, StorageError> {
        let watch_interval = std::env::var("AUTOFLOW_WATCH_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_WATCH_INTERVAL);

        Ok(Self {
            db: DbConfig::from_env(),
            storage: StorageConfig::from_env()?,
            watch_interval,
        })
    }

    /// Config with no remote store at all.
    pub fn local_only(storage: StorageConfig) -> Self {
        Self {
            db: None,
            storage,
            watch_interval: DEFAULT_WATCH_INTERVAL,
        }
    }

    /// Config bridging to the given remote store.
    pub fn with_remote(db: DbConfig, storage: StorageConfig) -> Self {
        Self {
            db: Some(db),
            storage,
            watch_interval: DEFAULT_WATCH_INTERVAL,
        }
    }

    /// Override the watcher poll interval.
    pub fn with_watch_interval(mut self, interval: Duration) -> Self {
        self.watch_interval = interval;
        self
    }
}
