//! Coordinator errors.
//!
//! Store trouble never shows up here: remote failures degrade the
//! process to local-fallback mode instead of failing the command that
//! hit them.

use garage_core::JobId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GarageError {
    /// The command referenced a job the cache does not hold.
    #[error("job not found: {0}")]
    JobNotFound(JobId),

    /// The coordinator actor is gone or dropped the reply.
    #[error("coordinator unavailable: {0}")]
    Coordinator(String),
}
