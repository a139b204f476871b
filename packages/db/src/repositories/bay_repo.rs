//! Bay repository for the fixed roster.

use garage_core::{Bay, BayId, BayStatus};
use serde::{Deserialize, Serialize};
use surrealdb::sql::{Id, Thing};

use crate::{DbError, get_db};

/// Repository for bay persistence operations.
pub struct BayRepository;

/// Internal record type for SurrealDB. The numeric bay id is the
/// record key.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct BayRecord {
    #[serde(default, skip_serializing)]
    id: Option<Thing>,
    name: String,
    status: BayStatus,
}

impl BayRecord {
    fn from_bay(bay: &Bay) -> Self {
        Self {
            id: None,
            name: bay.name.clone(),
            status: bay.status,
        }
    }

    /// Map back to the domain type. A record whose key does not parse
    /// as a bay number is treated as absent.
    fn into_bay(self) -> Option<Bay> {
        let id = match self.id?.id {
            Id::Number(n) => BayId(u8::try_from(n).ok()?),
            Id::String(s) => BayId(s.parse().ok()?),
            _ => return None,
        };
        Some(Bay {
            id,
            name: self.name,
            status: self.status,
        })
    }
}

impl BayRepository {
    /// List all bays, ascending by id.
    pub async fn list() -> Result<Vec<Bay>, DbError> {
        let db = get_db()?;

        let mut response = db.query("SELECT * FROM bay ORDER BY id ASC").await?;
        let records: Vec<BayRecord> = response.take(0)?;

        Ok(records.into_iter().filter_map(BayRecord::into_bay).collect())
    }

    /// Upsert the fixed roster. Safe to call again; existing records
    /// are overwritten in place.
    pub async fn seed_roster(bays: &[Bay]) -> Result<(), DbError> {
        let db = get_db()?;

        for bay in bays {
            let _: Option<BayRecord> = db
                .upsert(("bay", i64::from(bay.id.0)))
                .content(BayRecord::from_bay(bay))
                .await?;
        }

        tracing::info!("Seeded {} bays", bays.len());
        Ok(())
    }
}
