//! Message types for the garage coordinator actor.

use chrono::{DateTime, NaiveDate, Utc};
use garage_core::{Bay, BayId, GarageStats, Job, JobDraft, JobId, JobPatch, JobStatus};
use ractor::RpcReplyPort;

use crate::error::GarageError;
use crate::garage_actor::SyncMode;

/// Messages handled by the [`crate::GarageActor`].
///
/// Queries answer from the in-memory cache and never touch a store.
/// The internal variants are sent by the live-subscription and
/// watcher tasks, never by callers.
#[derive(Debug)]
pub enum GarageMessage {
    // Commands
    /// Create a new job from a draft.
    AddJob {
        draft: Box<JobDraft>,
        reply: RpcReplyPort<Result<Job, GarageError>>,
    },

    /// Apply a lifecycle transition, optionally appending a note.
    UpdateJobStatus {
        id: JobId,
        status: JobStatus,
        note: Option<String>,
        reply: RpcReplyPort<Result<Job, GarageError>>,
    },

    /// Apply partial field edits without lifecycle validation.
    UpdateJobDetails {
        id: JobId,
        patch: Box<JobPatch>,
        reply: RpcReplyPort<Result<Job, GarageError>>,
    },

    // Queries
    /// All jobs, newest first.
    GetAllJobs { reply: RpcReplyPort<Vec<Job>> },

    /// Jobs attached to a bay, excluding appointments not yet
    /// dispatched.
    GetJobsByBay {
        bay: BayId,
        reply: RpcReplyPort<Vec<Job>>,
    },

    /// The single job being worked on in a bay, if any.
    GetActiveJob {
        bay: BayId,
        reply: RpcReplyPort<Option<Job>>,
    },

    /// Jobs waiting in a bay (queued or on hold).
    GetQueue {
        bay: BayId,
        reply: RpcReplyPort<Vec<Job>>,
    },

    /// All appointments, ascending by scheduled time.
    GetScheduledJobs { reply: RpcReplyPort<Vec<Job>> },

    /// A customer's jobs, newest first.
    GetJobsByCustomer {
        customer_id: String,
        reply: RpcReplyPort<Vec<Job>>,
    },

    /// The bay roster.
    GetBays { reply: RpcReplyPort<Vec<Bay>> },

    /// Per-status aggregate counts.
    GetStats { reply: RpcReplyPort<GarageStats> },

    /// Candidate start instants for a new job on a date.
    FindSlots {
        date: NaiveDate,
        duration_hours: f64,
        reply: RpcReplyPort<Vec<DateTime<Utc>>>,
    },

    /// Which store the coordinator is currently backed by.
    GetSyncMode { reply: RpcReplyPort<SyncMode> },

    // Internal sync signals
    /// Fresh wholesale snapshot of the remote job collection.
    RemoteJobs(Vec<Job>),

    /// Fresh wholesale snapshot of the remote bay collection.
    RemoteBays(Vec<Bay>),

    /// A remote subscription failed; switch to local fallback.
    RemoteFault(String),

    /// A sibling process rewrote the local snapshot.
    LocalChanged,
}
