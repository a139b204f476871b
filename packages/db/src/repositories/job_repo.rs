//! Job repository for CRUD operations.

use chrono::{DateTime, Utc};
use garage_core::{BayId, Job, JobId, JobStatus};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

use crate::{DbError, get_db};

/// Repository for job persistence operations.
pub struct JobRepository;

/// Internal record type for SurrealDB. The record key carries the id;
/// the body never does.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JobRecord {
    #[serde(default, skip_serializing)]
    id: Option<Thing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bay_id: Option<BayId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    customer_id: Option<String>,
    owner_name: String,
    car_model: String,
    license_plate: String,
    service_description: String,
    status: JobStatus,
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scheduled_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    notes: Vec<String>,
    estimated_duration_hours: f64,
}

impl JobRecord {
    fn from_job(job: &Job) -> Self {
        Self {
            id: None,
            bay_id: job.bay_id,
            customer_id: job.customer_id.clone(),
            owner_name: job.owner_name.clone(),
            car_model: job.car_model.clone(),
            license_plate: job.license_plate.clone(),
            service_description: job.service_description.clone(),
            status: job.status,
            created_at: job.created_at,
            scheduled_time: job.scheduled_time,
            started_at: job.started_at,
            completed_at: job.completed_at,
            notes: job.notes.clone(),
            estimated_duration_hours: job.estimated_duration_hours,
        }
    }

    fn into_job(self) -> Job {
        let id = match &self.id {
            Some(thing) => JobId::from(thing.id.to_raw()),
            None => JobId::unassigned(),
        };
        Job {
            id,
            bay_id: self.bay_id,
            customer_id: self.customer_id,
            owner_name: self.owner_name,
            car_model: self.car_model,
            license_plate: self.license_plate,
            service_description: self.service_description,
            status: self.status,
            created_at: self.created_at,
            scheduled_time: self.scheduled_time,
            started_at: self.started_at,
            completed_at: self.completed_at,
            notes: self.notes,
            estimated_duration_hours: self.estimated_duration_hours,
        }
    }
}

impl JobRepository {
    /// Create a job, letting the store assign the record key.
    ///
    /// Whatever id the given job carries is ignored; the returned job
    /// holds the store-assigned one.
    pub async fn create(job: &Job) -> Result<Job, DbError> {
        let db = get_db()?;

        let record: Option<JobRecord> =
            db.create("job").content(JobRecord::from_job(job)).await?;

        record
            .map(JobRecord::into_job)
            .ok_or_else(|| DbError::Query("create returned no job record".into()))
    }

    /// Get a job by id.
    pub async fn get(id: &JobId) -> Result<Option<Job>, DbError> {
        let db = get_db()?;

        let record: Option<JobRecord> = db.select(("job", id.as_str())).await?;

        Ok(record.map(JobRecord::into_job))
    }

    /// Replace a job's stored record with the given state.
    pub async fn update(job: &Job) -> Result<Job, DbError> {
        let db = get_db()?;

        let record: Option<JobRecord> = db
            .update(("job", job.id.as_str()))
            .content(JobRecord::from_job(job))
            .await?;

        record
            .map(JobRecord::into_job)
            .ok_or_else(|| DbError::NotFound(format!("job not found: {}", job.id)))
    }

    /// List all jobs, newest first.
    pub async fn list() -> Result<Vec<Job>, DbError> {
        let db = get_db()?;

        let mut response = db.query("SELECT * FROM job ORDER BY createdAt DESC").await?;
        let records: Vec<JobRecord> = response.take(0)?;

        Ok(records.into_iter().map(JobRecord::into_job).collect())
    }
}
