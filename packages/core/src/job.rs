//! Job domain types for vehicle service work.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::bay::BayId;

/// Unique identifier for a job.
///
/// In remote mode the id is the record key assigned by the store; in
/// local-fallback mode ids are generated here with a `local-` prefix
/// (ULID, so they stay chronologically sortable) and can never collide
/// with store-assigned keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub const LOCAL_PREFIX: &'static str = "local-";

    /// Generate an offline id (`local-<ULID>`).
    pub fn local() -> Self {
        Self(format!("{}{}", Self::LOCAL_PREFIX, Ulid::new()))
    }

    /// Placeholder for a record the store has not keyed yet.
    pub fn unassigned() -> Self {
        Self(String::new())
    }

    /// Whether this id was generated locally rather than by the store.
    pub fn is_local(&self) -> bool {
        self.0.starts_with(Self::LOCAL_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for JobId {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for JobId {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Current status of a job in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Appointment booked for a future time, not yet dispatched.
    Scheduled,
    /// Waiting in a bay queue (walk-in intake default).
    Queued,
    /// Being worked on in a bay.
    InProgress,
    /// Paused, waiting on parts or a decision.
    OnHold,
    /// Work finished, vehicle ready for pickup.
    Completed,
    /// Called off; the record is kept, never deleted.
    Cancelled,
}

impl JobStatus {
    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Cancelled)
    }

    /// Get the wire-format status string.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Scheduled => "SCHEDULED",
            JobStatus::Queued => "QUEUED",
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::OnHold => "ON_HOLD",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Cancelled => "CANCELLED",
        }
    }

    /// Human-readable form for customer-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Scheduled => "SCHEDULED",
            JobStatus::Queued => "QUEUED",
            JobStatus::InProgress => "IN PROGRESS",
            JobStatus::OnHold => "ON HOLD",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A unit of vehicle service work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Unique identifier for this job.
    pub id: JobId,
    /// Assigned bay; absent means unassigned/queued-at-large.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bay_id: Option<BayId>,
    /// Linked customer identity, if the owner has an account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    pub owner_name: String,
    pub car_model: String,
    pub license_plate: String,
    pub service_description: String,
    /// Current lifecycle status.
    pub status: JobStatus,
    /// When the job was created.
    pub created_at: DateTime<Utc>,
    /// Appointment time; a job with this set and no bay is awaiting
    /// dispatch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<DateTime<Utc>>,
    /// Set exactly once, on the first transition to IN_PROGRESS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Set on transition to COMPLETED.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Free-text notes, ordered, append-only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// Positive, in 0.5 hour steps.
    pub estimated_duration_hours: f64,
}

/// Creation payload for a job: everything the caller supplies, with
/// id, creation time, and initial status filled in at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    pub owner_name: String,
    pub car_model: String,
    pub license_plate: String,
    pub service_description: String,
    pub estimated_duration_hours: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bay_id: Option<BayId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

impl JobDraft {
    pub fn new(
        owner_name: impl Into<String>,
        car_model: impl Into<String>,
        license_plate: impl Into<String>,
        service_description: impl Into<String>,
        estimated_duration_hours: f64,
    ) -> Self {
        Self {
            owner_name: owner_name.into(),
            car_model: car_model.into(),
            license_plate: license_plate.into(),
            service_description: service_description.into(),
            estimated_duration_hours,
            bay_id: None,
            scheduled_time: None,
            customer_id: None,
        }
    }

    /// Assign a bay up front.
    pub fn with_bay(mut self, bay: BayId) -> Self {
        self.bay_id = Some(bay);
        self
    }

    /// Book as an appointment; the job will start out SCHEDULED
    /// instead of QUEUED.
    pub fn scheduled_for(mut self, time: DateTime<Utc>) -> Self {
        self.scheduled_time = Some(time);
        self
    }

    /// Link the job to a customer account.
    pub fn for_customer(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    /// Materialize the draft into a job under the given id.
    ///
    /// Initial status is SCHEDULED when an appointment time was
    /// supplied, QUEUED otherwise.
    pub fn into_job(self, id: JobId) -> Job {
        let status = if self.scheduled_time.is_some() {
            JobStatus::Scheduled
        } else {
            JobStatus::Queued
        };
        Job {
            id,
            bay_id: self.bay_id,
            customer_id: self.customer_id,
            owner_name: self.owner_name,
            car_model: self.car_model,
            license_plate: self.license_plate,
            service_description: self.service_description,
            status,
            created_at: Utc::now(),
            scheduled_time: self.scheduled_time,
            started_at: None,
            completed_at: None,
            notes: Vec::new(),
            estimated_duration_hours: self.estimated_duration_hours,
        }
    }
}

/// Partial field edits for a job, applied without lifecycle
/// validation. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bay_id: Option<BayId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_plate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration_hours: Option<f64>,
}

impl JobPatch {
    /// Move a job to a different bay.
    pub fn reassign_bay(bay: BayId) -> Self {
        Self {
            bay_id: Some(bay),
            ..Default::default()
        }
    }

    /// Apply the set fields onto a job.
    pub fn apply(&self, job: &mut Job) {
        if let Some(bay) = self.bay_id {
            job.bay_id = Some(bay);
        }
        if let Some(customer_id) = &self.customer_id {
            job.customer_id = Some(customer_id.clone());
        }
        if let Some(owner_name) = &self.owner_name {
            job.owner_name = owner_name.clone();
        }
        if let Some(car_model) = &self.car_model {
            job.car_model = car_model.clone();
        }
        if let Some(license_plate) = &self.license_plate {
            job.license_plate = license_plate.clone();
        }
        if let Some(service_description) = &self.service_description {
            job.service_description = service_description.clone();
        }
        if let Some(scheduled_time) = self.scheduled_time {
            job.scheduled_time = Some(scheduled_time);
        }
        if let Some(hours) = self.estimated_duration_hours {
            job.estimated_duration_hours = hours;
        }
    }
}
