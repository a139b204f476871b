//! Live change subscriptions over the job and bay collections.
//!
//! A subscription surfaces *that* a collection changed, not what
//! changed; the consumer refetches the collection wholesale so that
//! its cache always mirrors a complete store snapshot.

use futures_util::StreamExt;

use crate::repositories::{BayRecord, JobRecord};
use crate::{DbError, get_db};

/// Live subscription over the `job` collection.
pub struct JobsSubscription {
    stream: surrealdb::method::Stream<Vec<JobRecord>>,
}

impl JobsSubscription {
    /// Open a live query over the job collection.
    pub async fn open() -> Result<Self, DbError> {
        let db = get_db()?;
        let stream = db.select("job").live().await?;
        Ok(Self { stream })
    }

    /// Wait for the next mutation on the collection.
    ///
    /// Returns `None` when the stream closes, `Some(Err)` when the
    /// subscription itself fails.
    pub async fn next_change(&mut self) -> Option<Result<(), DbError>> {
        let item = self.stream.next().await?;
        Some(item.map(|_| ()).map_err(DbError::from))
    }
}

/// Live subscription over the `bay` collection.
pub struct BaysSubscription {
    stream: surrealdb::method::Stream<Vec<BayRecord>>,
}

impl BaysSubscription {
    /// Open a live query over the bay collection.
    pub async fn open() -> Result<Self, DbError> {
        let db = get_db()?;
        let stream = db.select("bay").live().await?;
        Ok(Self { stream })
    }

    /// Wait for the next mutation on the collection.
    ///
    /// Returns `None` when the stream closes, `Some(Err)` when the
    /// subscription itself fails.
    pub async fn next_change(&mut self) -> Option<Result<(), DbError>> {
        let item = self.stream.next().await?;
        Some(item.map(|_| ()).map_err(DbError::from))
    }
}
