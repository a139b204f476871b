use db::{DbConfig, DbError};

/// Connect the process-wide database handle to an in-memory engine
/// and install the schema. Idempotent across calls in one process.
pub async fn setup_db() -> Result<(), DbError> {
    db::init(DbConfig::memory()).await
}
