//! Database schema definitions using SurrealQL.

use crate::{DbError, get_db};

/// Initialize the database schema.
///
/// This creates all necessary tables, fields, and indexes.
pub async fn init_schema() -> Result<(), DbError> {
    let db = get_db()?;

    tracing::info!("Initializing database schema...");

    db.query(JOB_SCHEMA).await?;
    db.query(BAY_SCHEMA).await?;

    tracing::info!("Database schema initialized");

    Ok(())
}

/// Job table schema.
const JOB_SCHEMA: &str = r#"
-- Job table for service work records
DEFINE TABLE IF NOT EXISTS job SCHEMAFULL;

DEFINE FIELD IF NOT EXISTS bayId ON job TYPE option<int>;
DEFINE FIELD IF NOT EXISTS customerId ON job TYPE option<string>;
DEFINE FIELD IF NOT EXISTS ownerName ON job TYPE string;
DEFINE FIELD IF NOT EXISTS carModel ON job TYPE string;
DEFINE FIELD IF NOT EXISTS licensePlate ON job TYPE string;
DEFINE FIELD IF NOT EXISTS serviceDescription ON job TYPE string;
DEFINE FIELD IF NOT EXISTS status ON job TYPE string DEFAULT "QUEUED";
DEFINE FIELD IF NOT EXISTS createdAt ON job TYPE datetime DEFAULT time::now();
DEFINE FIELD IF NOT EXISTS scheduledTime ON job TYPE option<datetime>;
DEFINE FIELD IF NOT EXISTS startedAt ON job TYPE option<datetime>;
DEFINE FIELD IF NOT EXISTS completedAt ON job TYPE option<datetime>;
DEFINE FIELD IF NOT EXISTS notes ON job TYPE array<string> DEFAULT [];
DEFINE FIELD IF NOT EXISTS estimatedDurationHours ON job TYPE float;

-- Indexes for the common access paths
DEFINE INDEX IF NOT EXISTS job_status ON job FIELDS status;
DEFINE INDEX IF NOT EXISTS job_bay ON job FIELDS bayId;
DEFINE INDEX IF NOT EXISTS job_customer ON job FIELDS customerId;
DEFINE INDEX IF NOT EXISTS job_created ON job FIELDS createdAt;
"#;

/// Bay table schema.
const BAY_SCHEMA: &str = r#"
-- Bay table for the fixed roster of service positions
DEFINE TABLE IF NOT EXISTS bay SCHEMAFULL;

DEFINE FIELD IF NOT EXISTS name ON bay TYPE string;
DEFINE FIELD IF NOT EXISTS status ON bay TYPE string DEFAULT "AVAILABLE";
"#;
