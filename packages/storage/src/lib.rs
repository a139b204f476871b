//! Local snapshot store used when the remote store is unreachable.
//!
//! Goal:
//! - On-disk storage for normal offline operation, shared between
//!   sibling processes on the same machine
//! - In-memory storage for tests
//!
//! The whole garage state travels as one wholesale JSON snapshot
//! (`{jobs, bays}`) under a single fixed key; there are no partial
//! updates. Sibling processes converge by watching the snapshot's
//! metadata for changes.
//!
//! Implementation note:
//! This is intentionally a small wrapper around `object_store`, which
//! already provides local filesystem and in-memory backends.

use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use object_store::ObjectStore;
use object_store::ObjectStoreExt;
use object_store::path::Path;
use serde::{Deserialize, Serialize};

use garage_core::{Bay, Job};

/// Fixed key the snapshot lives under; also the unit the watcher
/// observes.
pub const SNAPSHOT_KEY: &str = "autoflow/state.json";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid storage config: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("object_store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The local store's entire payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub bays: Vec<Bay>,
}

impl Snapshot {
    pub fn new(jobs: Vec<Job>, bays: Vec<Bay>) -> Self {
        Self { jobs, bays }
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty() && self.bays.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Filesystem,
    Memory,
}

impl StorageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKind::Filesystem => "filesystem",
            StorageKind::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone)]
pub enum StorageConfig {
    Filesystem { root: PathBuf },
    Memory,
}

impl StorageConfig {
    pub fn memory() -> Self {
        Self::Memory
    }

    pub fn filesystem(root: impl Into<PathBuf>) -> Self {
        Self::Filesystem { root: root.into() }
    }

    /// Build a config from environment variables.
    ///
    /// Selection rules:
    /// - If `AUTOFLOW_STORAGE_BACKEND` is set: use it (`filesystem`,
    ///   `memory`)
    /// - Otherwise: default to filesystem
    ///
    /// Filesystem env vars:
    /// - `AUTOFLOW_STORAGE_ROOT` (default: `./data/autoflow`)
    pub fn from_env() -> Result<Self, StorageError> {
        let backend = std::env::var("AUTOFLOW_STORAGE_BACKEND").ok();

        let cfg = match backend.as_deref() {
            Some("memory") | Some("mem") => Self::memory(),
            Some("filesystem") | Some("fs") | None => Self::filesystem(fs_root_from_env()),
            Some(other) => {
                return Err(StorageError::InvalidConfig(format!(
                    "unsupported AUTOFLOW_STORAGE_BACKEND={other} (expected filesystem|memory)"
                )));
            }
        };

        Ok(cfg)
    }
}

/// Identity of a stored snapshot revision, compared by the watcher to
/// detect writes from sibling processes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotVersion {
    pub last_modified: DateTime<Utc>,
    pub size: u64,
    pub e_tag: Option<String>,
}

/// Handle to the local snapshot store. Cheap to clone; clones share
/// the backend.
#[derive(Clone)]
pub struct LocalStore {
    kind: StorageKind,
    store: Arc<dyn ObjectStore>,
}

impl LocalStore {
    pub fn new(cfg: StorageConfig) -> Result<Self, StorageError> {
        let (kind, store) = match cfg {
            StorageConfig::Filesystem { root } => {
                ensure_dir(&root)?;
                let fs = object_store::local::LocalFileSystem::new_with_prefix(&root)?;
                (StorageKind::Filesystem, Arc::new(fs) as _)
            }
            StorageConfig::Memory => {
                let mem = object_store::memory::InMemory::new();
                (StorageKind::Memory, Arc::new(mem) as _)
            }
        };

        Ok(Self { kind, store })
    }

    pub fn from_env() -> Result<Self, StorageError> {
        Self::new(StorageConfig::from_env()?)
    }

    pub fn kind(&self) -> StorageKind {
        self.kind
    }

    fn key(&self) -> Path {
        Path::from(SNAPSHOT_KEY)
    }

    /// Load the snapshot.
    ///
    /// A missing snapshot is `None`. A snapshot that fails to parse is
    /// also `None` — a corrupt record must read as absent rather than
    /// wedge every consumer.
    pub async fn load(&self) -> Result<Option<Snapshot>, StorageError> {
        let bytes = match self.store.get(&self.key()).await {
            Ok(result) => result.bytes().await?,
            Err(object_store::Error::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                tracing::warn!("Discarding unreadable local snapshot: {e}");
                Ok(None)
            }
        }
    }

    /// Persist the snapshot wholesale.
    pub async fn save(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(snapshot)?;
        self.store
            .put(&self.key(), object_store::PutPayload::from(Bytes::from(bytes)))
            .await?;
        tracing::debug!(
            jobs = snapshot.jobs.len(),
            bays = snapshot.bays.len(),
            "Persisted local snapshot"
        );
        Ok(())
    }

    /// Current revision identity of the stored snapshot, `None` if no
    /// snapshot exists yet.
    pub async fn fingerprint(&self) -> Result<Option<SnapshotVersion>, StorageError> {
        match self.store.head(&self.key()).await {
            Ok(meta) => Ok(Some(SnapshotVersion {
                last_modified: meta.last_modified,
                size: meta.size,
                e_tag: meta.e_tag,
            })),
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn ensure_dir(root: &FsPath) -> Result<(), StorageError> {
    std::fs::create_dir_all(root)?;
    Ok(())
}

fn fs_root_from_env() -> PathBuf {
    std::env::var("AUTOFLOW_STORAGE_ROOT")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./data/autoflow"))
}
