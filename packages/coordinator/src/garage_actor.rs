//! The single-owner state actor behind the coordinator.
//!
//! All job/bay state lives in this actor. Commands, queries, live
//! sync signals, and watcher ticks are mailbox messages processed one
//! at a time, so the cache needs no locking: a read that executes
//! after a write command returned always observes that write,
//! whatever the backing store is doing.

use chrono::{DateTime, Utc};
use ractor::{Actor, ActorProcessingErr, ActorRef};
use tokio::task::JoinHandle;

use db::repositories::{BayRepository, JobRepository};
use db::{BaysSubscription, DbConfig, JobsSubscription};
use garage_core::{
    Bay, GarageStats, Job, JobDraft, JobId, JobStatus, Notification, calendar, lifecycle,
};
use storage::{LocalStore, Snapshot};

use crate::config::GarageConfig;
use crate::error::GarageError;
use crate::events::EventBus;
use crate::messages::GarageMessage;
use crate::seed;

/// Which store currently backs the coordinator.
///
/// The only transition is `Remote` to `LocalFallback`, taken by
/// [`enter_local_fallback`]; nothing assigns `Remote` after startup,
/// so the switch is final for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Bridged to the remote store via live subscriptions.
    Remote,
    /// Degraded to the local snapshot plus the cross-process watcher.
    LocalFallback,
}

impl std::fmt::Display for SyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncMode::Remote => write!(f, "remote"),
            SyncMode::LocalFallback => write!(f, "local-fallback"),
        }
    }
}

/// Arguments for spawning the actor.
pub struct GarageArgs {
    pub config: GarageConfig,
    pub bus: EventBus,
}

/// State owned by the actor.
pub struct GarageState {
    /// All known jobs, newest first.
    jobs: Vec<Job>,
    /// The bay roster, ascending by id.
    bays: Vec<Bay>,
    mode: SyncMode,
    bus: EventBus,
    local: LocalStore,
    watch_interval: std::time::Duration,
    /// Remote live-subscription tasks, aborted on fallback.
    live_tasks: Vec<JoinHandle<()>>,
    /// Local snapshot watcher, running only in fallback mode.
    watcher: Option<JoinHandle<()>>,
}

/// The garage coordinator actor.
pub struct GarageActor;

impl Actor for GarageActor {
    type Msg = GarageMessage;
    type State = GarageState;
    type Arguments = GarageArgs;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let local = LocalStore::new(args.config.storage.clone())
            .map_err(|e| ActorProcessingErr::from(format!("local store unusable: {e}")))?;

        let mut state = GarageState {
            jobs: Vec::new(),
            bays: Vec::new(),
            mode: SyncMode::Remote,
            bus: args.bus,
            local,
            watch_interval: args.config.watch_interval,
            live_tasks: Vec::new(),
            watcher: None,
        };

        match args.config.db {
            Some(db_config) => match connect_remote(&myself, &mut state, db_config).await {
                Ok(()) => tracing::info!("Garage coordinator online (remote store)"),
                Err(e) => {
                    tracing::warn!("Remote store unavailable at startup: {e}");
                    enter_local_fallback(&myself, &mut state).await;
                }
            },
            None => {
                tracing::info!("No remote store configured");
                enter_local_fallback(&myself, &mut state).await;
            }
        }

        Ok(state)
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            // Commands
            GarageMessage::AddJob { draft, reply } => {
                let result = add_job(&myself, state, *draft).await;
                let _ = reply.send(result);
            }

            GarageMessage::UpdateJobStatus {
                id,
                status,
                note,
                reply,
            } => {
                let result = update_job_status(&myself, state, &id, status, note.as_deref()).await;
                let _ = reply.send(result);
            }

            GarageMessage::UpdateJobDetails { id, patch, reply } => {
                let result = update_job_details(&myself, state, &id, &patch).await;
                let _ = reply.send(result);
            }

            // Queries
            GarageMessage::GetAllJobs { reply } => {
                let _ = reply.send(state.jobs.clone());
            }

            GarageMessage::GetJobsByBay { bay, reply } => {
                let jobs = state
                    .jobs
                    .iter()
                    .filter(|j| j.bay_id == Some(bay) && j.status != JobStatus::Scheduled)
                    .cloned()
                    .collect();
                let _ = reply.send(jobs);
            }

            GarageMessage::GetActiveJob { bay, reply } => {
                let job = state
                    .jobs
                    .iter()
                    .find(|j| j.bay_id == Some(bay) && j.status == JobStatus::InProgress)
                    .cloned();
                let _ = reply.send(job);
            }

            GarageMessage::GetQueue { bay, reply } => {
                let jobs = state
                    .jobs
                    .iter()
                    .filter(|j| {
                        j.bay_id == Some(bay)
                            && matches!(j.status, JobStatus::Queued | JobStatus::OnHold)
                    })
                    .cloned()
                    .collect();
                let _ = reply.send(jobs);
            }

            GarageMessage::GetScheduledJobs { reply } => {
                let mut jobs: Vec<Job> = state
                    .jobs
                    .iter()
                    .filter(|j| j.status == JobStatus::Scheduled)
                    .cloned()
                    .collect();
                jobs.sort_by_key(|j| j.scheduled_time.unwrap_or(DateTime::<Utc>::MIN_UTC));
                let _ = reply.send(jobs);
            }

            GarageMessage::GetJobsByCustomer { customer_id, reply } => {
                let mut jobs: Vec<Job> = state
                    .jobs
                    .iter()
                    .filter(|j| j.customer_id.as_deref() == Some(customer_id.as_str()))
                    .cloned()
                    .collect();
                jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                let _ = reply.send(jobs);
            }

            GarageMessage::GetBays { reply } => {
                let _ = reply.send(state.bays.clone());
            }

            GarageMessage::GetStats { reply } => {
                let _ = reply.send(GarageStats::from_jobs(&state.jobs));
            }

            GarageMessage::FindSlots {
                date,
                duration_hours,
                reply,
            } => {
                let slots = calendar::find_available_slots(date, duration_hours, &state.jobs);
                let _ = reply.send(slots);
            }

            GarageMessage::GetSyncMode { reply } => {
                let _ = reply.send(state.mode);
            }

            // Internal sync signals
            GarageMessage::RemoteJobs(jobs) => {
                if state.mode == SyncMode::Remote {
                    state.jobs = jobs;
                    state.bus.publish_change();
                }
            }

            GarageMessage::RemoteBays(bays) => {
                if state.mode == SyncMode::Remote {
                    state.bays = bays;
                    state.bus.publish_change();
                }
            }

            GarageMessage::RemoteFault(reason) => {
                if state.mode == SyncMode::Remote {
                    tracing::warn!("Remote subscription fault: {reason}");
                    enter_local_fallback(&myself, state).await;
                }
            }

            GarageMessage::LocalChanged => {
                if state.mode == SyncMode::LocalFallback {
                    reload_local(state).await;
                }
            }
        }
        Ok(())
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        for task in state.live_tasks.drain(..) {
            task.abort();
        }
        if let Some(watcher) = state.watcher.take() {
            watcher.abort();
        }
        Ok(())
    }
}

/// Connect to the remote store: install the schema, pull the initial
/// snapshots (seeding the bay roster exactly once if the collection
/// is empty), and open both live subscriptions.
async fn connect_remote(
    myself: &ActorRef<GarageMessage>,
    state: &mut GarageState,
    config: DbConfig,
) -> Result<(), db::DbError> {
    db::init(config).await?;

    state.jobs = JobRepository::list().await?;
    let mut bays = BayRepository::list().await?;
    if bays.is_empty() {
        BayRepository::seed_roster(&Bay::roster()).await?;
        bays = BayRepository::list().await?;
    }
    state.bays = bays;
    state.bus.publish_change();

    let jobs_sub = JobsSubscription::open().await?;
    let bays_sub = BaysSubscription::open().await?;
    state
        .live_tasks
        .push(tokio::spawn(forward_job_changes(myself.clone(), jobs_sub)));
    state
        .live_tasks
        .push(tokio::spawn(forward_bay_changes(myself.clone(), bays_sub)));

    Ok(())
}

/// Pump the jobs live subscription: every change triggers a wholesale
/// refetch pushed into the actor's mailbox. Ends itself on the first
/// fault, after reporting it.
async fn forward_job_changes(myself: ActorRef<GarageMessage>, mut sub: JobsSubscription) {
    while let Some(change) = sub.next_change().await {
        let message = match change {
            Ok(()) => match JobRepository::list().await {
                Ok(jobs) => GarageMessage::RemoteJobs(jobs),
                Err(e) => GarageMessage::RemoteFault(e.to_string()),
            },
            Err(e) => GarageMessage::RemoteFault(e.to_string()),
        };
        let fault = matches!(message, GarageMessage::RemoteFault(_));
        if myself.send_message(message).is_err() || fault {
            break;
        }
    }
}

async fn forward_bay_changes(myself: ActorRef<GarageMessage>, mut sub: BaysSubscription) {
    while let Some(change) = sub.next_change().await {
        let message = match change {
            Ok(()) => match BayRepository::list().await {
                Ok(bays) => GarageMessage::RemoteBays(bays),
                Err(e) => GarageMessage::RemoteFault(e.to_string()),
            },
            Err(e) => GarageMessage::RemoteFault(e.to_string()),
        };
        let fault = matches!(message, GarageMessage::RemoteFault(_));
        if myself.send_message(message).is_err() || fault {
            break;
        }
    }
}

/// Switch to the local snapshot store. One-way; calling this again is
/// a no-op. Existing cache contents survive unless a sibling process
/// already persisted a snapshot, which then wins wholesale.
async fn enter_local_fallback(myself: &ActorRef<GarageMessage>, state: &mut GarageState) {
    if state.mode == SyncMode::LocalFallback {
        return;
    }
    state.mode = SyncMode::LocalFallback;

    for task in state.live_tasks.drain(..) {
        task.abort();
    }
    // best-effort close of the remote session; it may be half-dead
    if let Ok(remote) = db::get_db() {
        let _ = remote.invalidate().await;
    }

    match state.local.load().await {
        Ok(Some(snapshot)) => {
            state.jobs = snapshot.jobs;
            state.bays = snapshot.bays;
        }
        Ok(None) => {}
        Err(e) => tracing::warn!("Local snapshot unavailable: {e}"),
    }

    // first run ever with no reachable store: put something on the board
    let mut seeded = false;
    if state.jobs.is_empty() {
        state.jobs = seed::demo_jobs();
        seeded = true;
    }
    if state.bays.is_empty() {
        state.bays = Bay::roster();
        seeded = true;
    }
    if seeded {
        persist_local(state).await;
    }

    state.watcher = Some(spawn_local_watcher(
        myself.clone(),
        state.local.clone(),
        state.watch_interval,
    ));

    state.bus.notify(Notification::info(
        "Remote store unavailable. Operating in offline mode; changes are kept on this device.",
    ));
    state.bus.publish_change();
    tracing::warn!("Entered local-fallback mode");
}

/// Poll the local snapshot for writes by sibling processes and nudge
/// the actor whenever its revision moves.
fn spawn_local_watcher(
    myself: ActorRef<GarageMessage>,
    store: LocalStore,
    interval: std::time::Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut last = store.fingerprint().await.ok().flatten();
        loop {
            ticker.tick().await;
            let current = match store.fingerprint().await {
                Ok(version) => version,
                Err(_) => continue,
            };
            if current != last {
                last = current;
                if myself.send_message(GarageMessage::LocalChanged).is_err() {
                    break;
                }
            }
        }
    })
}

/// Reload the cache wholesale from the local snapshot.
async fn reload_local(state: &mut GarageState) {
    match state.local.load().await {
        Ok(Some(snapshot)) => {
            state.jobs = snapshot.jobs;
            state.bays = snapshot.bays;
            state.bus.publish_change();
        }
        Ok(None) => {}
        Err(e) => tracing::warn!("Failed to reload local snapshot: {e}"),
    }
}

/// Persist the whole cache to the local store. Failure here only
/// costs cross-process convergence, never the command.
async fn persist_local(state: &GarageState) {
    let snapshot = Snapshot::new(state.jobs.clone(), state.bays.clone());
    if let Err(e) = state.local.save(&snapshot).await {
        tracing::warn!("Failed to persist local snapshot: {e}");
    }
}

/// Put a job into the cache, replacing any entry with the same id.
fn upsert_cached(state: &mut GarageState, job: &Job) {
    match state.jobs.iter_mut().find(|j| j.id == job.id) {
        Some(existing) => *existing = job.clone(),
        None => state.jobs.insert(0, job.clone()),
    }
}

async fn add_job(
    myself: &ActorRef<GarageMessage>,
    state: &mut GarageState,
    draft: JobDraft,
) -> Result<Job, GarageError> {
    match state.mode {
        SyncMode::Remote => {
            let job = draft.clone().into_job(JobId::unassigned());
            match JobRepository::create(&job).await {
                Ok(stored) => {
                    state.jobs.insert(0, stored.clone());
                    state.bus.publish_change();
                    state
                        .bus
                        .notify(Notification::info(format!("New job added: {}", stored.car_model)));
                    Ok(stored)
                }
                Err(e) => {
                    // the write was rejected, not the job: re-issue it
                    // on the local path so nothing is silently lost
                    tracing::warn!("Remote write rejected: {e}");
                    enter_local_fallback(myself, state).await;
                    add_local_job(state, draft).await
                }
            }
        }
        SyncMode::LocalFallback => add_local_job(state, draft).await,
    }
}

async fn add_local_job(state: &mut GarageState, draft: JobDraft) -> Result<Job, GarageError> {
    let job = draft.into_job(JobId::local());
    state.jobs.insert(0, job.clone());
    persist_local(state).await;
    state.bus.publish_change();
    state.bus.notify(Notification::info(format!(
        "New job added: {} (offline)",
        job.car_model
    )));
    Ok(job)
}

async fn update_job_status(
    myself: &ActorRef<GarageMessage>,
    state: &mut GarageState,
    id: &JobId,
    status: JobStatus,
    note: Option<&str>,
) -> Result<Job, GarageError> {
    let Some(index) = state.jobs.iter().position(|j| &j.id == id) else {
        return Err(GarageError::JobNotFound(id.clone()));
    };

    let outcome = lifecycle::transition(&state.jobs[index], status, note);
    state.jobs[index] = outcome.job.clone();

    if state.mode == SyncMode::LocalFallback {
        persist_local(state).await;
    }
    state.bus.publish_change();
    for notification in outcome.notifications {
        state.bus.notify(notification);
    }

    persist_job_update(myself, state, &outcome.job).await;
    Ok(outcome.job)
}

async fn update_job_details(
    myself: &ActorRef<GarageMessage>,
    state: &mut GarageState,
    id: &JobId,
    patch: &garage_core::JobPatch,
) -> Result<Job, GarageError> {
    let Some(index) = state.jobs.iter().position(|j| &j.id == id) else {
        return Err(GarageError::JobNotFound(id.clone()));
    };

    let mut job = state.jobs[index].clone();
    patch.apply(&mut job);
    state.jobs[index] = job.clone();

    if state.mode == SyncMode::LocalFallback {
        persist_local(state).await;
    }
    state.bus.publish_change();

    persist_job_update(myself, state, &job).await;
    Ok(job)
}

/// Persist an already-applied job mutation to the remote store.
///
/// A rejected write flips the process into fallback mode and re-plays
/// the optimistic state on top of whatever snapshot fallback adopted,
/// so the update is degraded to local durability instead of rolled
/// back. In fallback mode the cache was already persisted wholesale
/// by the caller.
async fn persist_job_update(
    myself: &ActorRef<GarageMessage>,
    state: &mut GarageState,
    job: &Job,
) {
    if state.mode != SyncMode::Remote {
        return;
    }
    if let Err(e) = JobRepository::update(job).await {
        tracing::warn!("Remote update failed: {e}");
        enter_local_fallback(myself, state).await;
        upsert_cached(state, job);
        persist_local(state).await;
        state.bus.publish_change();
    }
}
