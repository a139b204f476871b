//! The public handle the rest of the application talks to.

use chrono::{DateTime, NaiveDate, Utc};
use ractor::{Actor, ActorRef, RpcReplyPort};
use tokio::sync::broadcast;

use garage_core::{
    Bay, BayId, GarageStats, Job, JobDraft, JobId, JobPatch, JobStatus, Notification,
};

use crate::config::GarageConfig;
use crate::error::GarageError;
use crate::events::{ChangeEvent, EventBus};
use crate::garage_actor::{GarageActor, GarageArgs, SyncMode};
use crate::messages::GarageMessage;

/// Handle to a running garage coordinator.
///
/// Cheap to clone; every clone talks to the same actor. All methods
/// are answered in mailbox order, so a read issued after a command
/// resolved observes that command's effect.
#[derive(Clone)]
pub struct Garage {
    actor: ActorRef<GarageMessage>,
    bus: EventBus,
}

impl Garage {
    /// Spawn a coordinator with its own event bus.
    pub async fn start(config: GarageConfig) -> Result<Self, GarageError> {
        Self::start_with(config, EventBus::new()).await
    }

    /// Spawn a coordinator publishing on a caller-supplied bus.
    ///
    /// Useful when subscribers must be registered before startup
    /// notifications fire (the offline-mode notice, most notably).
    pub async fn start_with(config: GarageConfig, bus: EventBus) -> Result<Self, GarageError> {
        let args = GarageArgs {
            config,
            bus: bus.clone(),
        };
        let (actor, _handle) = Actor::spawn(None, GarageActor, args)
            .await
            .map_err(|e| GarageError::Coordinator(e.to_string()))?;
        Ok(Self { actor, bus })
    }

    /// Subscribe to state-changed events.
    pub fn subscribe_changes(&self) -> broadcast::Receiver<ChangeEvent> {
        self.bus.subscribe_changes()
    }

    /// Subscribe to notifications.
    pub fn subscribe_notifications(&self) -> broadcast::Receiver<Notification> {
        self.bus.subscribe_notifications()
    }

    /// Stop the coordinator actor.
    pub fn stop(&self) {
        self.actor.stop(None);
    }

    async fn call<T: Send + 'static>(
        &self,
        make: impl FnOnce(RpcReplyPort<T>) -> GarageMessage,
    ) -> Result<T, GarageError> {
        let (tx, rx) = ractor::concurrency::oneshot();
        self.actor
            .send_message(make(tx.into()))
            .map_err(|e| GarageError::Coordinator(e.to_string()))?;
        rx.await
            .map_err(|_| GarageError::Coordinator("coordinator dropped the reply".into()))
    }

    // Commands

    /// Create a job. Returns it with whichever id the active store
    /// produced.
    pub async fn add_job(&self, draft: JobDraft) -> Result<Job, GarageError> {
        self.call(|reply| GarageMessage::AddJob {
            draft: Box::new(draft),
            reply,
        })
        .await?
    }

    /// Apply a lifecycle transition, optionally appending a note.
    pub async fn update_job_status(
        &self,
        id: JobId,
        status: JobStatus,
        note: Option<&str>,
    ) -> Result<Job, GarageError> {
        let note = note.map(str::to_string);
        self.call(|reply| GarageMessage::UpdateJobStatus {
            id,
            status,
            note,
            reply,
        })
        .await?
    }

    /// Apply partial field edits (bay reassignment and the like)
    /// without lifecycle validation.
    pub async fn update_job_details(
        &self,
        id: JobId,
        patch: JobPatch,
    ) -> Result<Job, GarageError> {
        self.call(|reply| GarageMessage::UpdateJobDetails {
            id,
            patch: Box::new(patch),
            reply,
        })
        .await?
    }

    // Queries

    /// All jobs, newest first.
    pub async fn all_jobs(&self) -> Result<Vec<Job>, GarageError> {
        self.call(|reply| GarageMessage::GetAllJobs { reply }).await
    }

    /// Jobs attached to a bay, excluding undispatched appointments.
    pub async fn jobs_by_bay(&self, bay: BayId) -> Result<Vec<Job>, GarageError> {
        self.call(|reply| GarageMessage::GetJobsByBay { bay, reply })
            .await
    }

    /// The job being worked on in a bay, if any.
    pub async fn active_job(&self, bay: BayId) -> Result<Option<Job>, GarageError> {
        self.call(|reply| GarageMessage::GetActiveJob { bay, reply })
            .await
    }

    /// Jobs waiting in a bay: queued or on hold.
    pub async fn queue_for_bay(&self, bay: BayId) -> Result<Vec<Job>, GarageError> {
        self.call(|reply| GarageMessage::GetQueue { bay, reply }).await
    }

    /// All appointments, ascending by scheduled time.
    pub async fn scheduled_jobs(&self) -> Result<Vec<Job>, GarageError> {
        self.call(|reply| GarageMessage::GetScheduledJobs { reply })
            .await
    }

    /// A customer's jobs, newest first.
    pub async fn jobs_by_customer(
        &self,
        customer_id: impl Into<String>,
    ) -> Result<Vec<Job>, GarageError> {
        let customer_id = customer_id.into();
        self.call(|reply| GarageMessage::GetJobsByCustomer { customer_id, reply })
            .await
    }

    /// The bay roster.
    pub async fn bays(&self) -> Result<Vec<Bay>, GarageError> {
        self.call(|reply| GarageMessage::GetBays { reply }).await
    }

    /// Per-status aggregate counts.
    pub async fn stats(&self) -> Result<GarageStats, GarageError> {
        self.call(|reply| GarageMessage::GetStats { reply }).await
    }

    /// Instants on `date` at which a job of `duration_hours` could
    /// start in at least one bay.
    pub async fn find_available_slots(
        &self,
        date: NaiveDate,
        duration_hours: f64,
    ) -> Result<Vec<DateTime<Utc>>, GarageError> {
        self.call(|reply| GarageMessage::FindSlots {
            date,
            duration_hours,
            reply,
        })
        .await
    }

    /// Which store currently backs the coordinator.
    pub async fn sync_mode(&self) -> Result<SyncMode, GarageError> {
        self.call(|reply| GarageMessage::GetSyncMode { reply }).await
    }
}
