//! Coordinator behavior when no remote store is reachable.
//!
//! Every test here runs against the local snapshot store only; the
//! process-global database handle is never initialized.

use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use coordinator::{EventBus, Garage, GarageConfig, SyncMode};
use db::DbConfig;
use garage_core::{BayId, JobDraft, JobPatch, JobStatus};
use storage::StorageConfig;

fn local_config() -> GarageConfig {
    GarageConfig::local_only(StorageConfig::memory())
}

/// A remote endpoint nothing listens on.
fn dead_remote_config() -> GarageConfig {
    GarageConfig::with_remote(
        DbConfig::remote("ws://127.0.0.1:1"),
        StorageConfig::memory(),
    )
}

fn draft(plate: &str) -> JobDraft {
    JobDraft::new("Rory Quinn", "Mazda MX-5", plate, "Clutch adjustment", 2.0)
}

#[tokio::test]
async fn unreachable_remote_seeds_demo_data_and_notifies_once() {
    let bus = EventBus::new();
    let mut notes = bus.subscribe_notifications();

    let garage = Garage::start_with(dead_remote_config(), bus).await.unwrap();

    assert_eq!(garage.sync_mode().await.unwrap(), SyncMode::LocalFallback);

    let jobs = garage.all_jobs().await.unwrap();
    assert_eq!(jobs.len(), 2);
    assert!(jobs.iter().any(|j| j.car_model == "Tesla Model 3"));
    assert!(jobs.iter().any(|j| j.car_model == "Ford F-150"));

    let bays = garage.bays().await.unwrap();
    assert_eq!(bays.len(), 5);

    let offline = notes.recv().await.unwrap();
    assert!(offline.message.contains("offline"));
    assert!(notes.try_recv().is_err(), "only one startup notification");

    garage.stop();
}

#[tokio::test]
async fn unconfigured_remote_goes_straight_to_fallback() {
    let garage = Garage::start(local_config()).await.unwrap();
    assert_eq!(garage.sync_mode().await.unwrap(), SyncMode::LocalFallback);
    garage.stop();
}

#[tokio::test]
async fn added_jobs_get_local_ids_and_are_immediately_readable() {
    let garage = Garage::start(local_config()).await.unwrap();

    let job = garage.add_job(draft("QWX-100")).await.unwrap();
    assert!(job.id.is_local());
    assert_eq!(job.status, JobStatus::Queued);

    let jobs = garage.all_jobs().await.unwrap();
    // newest first, ahead of the demo seed
    assert_eq!(jobs[0].id, job.id);

    garage.stop();
}

#[tokio::test]
async fn status_updates_are_optimistic_and_started_at_is_stamped_once() {
    let garage = Garage::start(local_config()).await.unwrap();
    let job = garage.add_job(draft("QWX-101").with_bay(BayId(3))).await.unwrap();

    let started = garage
        .update_job_status(job.id.clone(), JobStatus::InProgress, None)
        .await
        .unwrap();
    let first_stamp = started.started_at;
    assert!(first_stamp.is_some());

    // visible to the very next read
    let active = garage.active_job(BayId(3)).await.unwrap().unwrap();
    assert_eq!(active.id, job.id);
    assert_eq!(active.status, JobStatus::InProgress);

    // a repeated transition keeps the original stamp
    let again = garage
        .update_job_status(job.id.clone(), JobStatus::InProgress, None)
        .await
        .unwrap();
    assert_eq!(again.started_at, first_stamp);

    let done = garage
        .update_job_status(job.id.clone(), JobStatus::Completed, None)
        .await
        .unwrap();
    assert!(done.completed_at.is_some());

    garage.stop();
}

#[tokio::test]
async fn hold_emits_one_manager_alert_and_appends_the_note() {
    let bus = EventBus::new();
    let garage = Garage::start_with(local_config(), bus.clone()).await.unwrap();
    let job = garage.add_job(draft("QWX-102").with_bay(BayId(2))).await.unwrap();

    let mut notes = bus.subscribe_notifications();
    let held = garage
        .update_job_status(job.id.clone(), JobStatus::OnHold, Some("parts on order"))
        .await
        .unwrap();

    assert_eq!(held.notes, vec!["parts on order".to_string()]);

    let alert = notes.recv().await.unwrap();
    assert_eq!(alert.recipient_role, Some(garage_core::UserRole::Manager));
    assert!(notes.try_recv().is_err(), "exactly one notification");

    garage.stop();
}

#[tokio::test]
async fn queries_slice_the_cache_by_bay_status_and_customer() {
    let garage = Garage::start(local_config()).await.unwrap();

    let queued = garage.add_job(draft("SLC-001").with_bay(BayId(4))).await.unwrap();
    let held = garage.add_job(draft("SLC-002").with_bay(BayId(4))).await.unwrap();
    garage
        .update_job_status(held.id.clone(), JobStatus::OnHold, None)
        .await
        .unwrap();

    let active = garage.add_job(draft("SLC-003").with_bay(BayId(4))).await.unwrap();
    garage
        .update_job_status(active.id.clone(), JobStatus::InProgress, None)
        .await
        .unwrap();

    let soon = Utc::now() + ChronoDuration::hours(3);
    let later = Utc::now() + ChronoDuration::hours(6);
    garage
        .add_job(draft("SLC-004").scheduled_for(later).for_customer("u-9"))
        .await
        .unwrap();
    garage
        .add_job(draft("SLC-005").scheduled_for(soon).for_customer("u-9"))
        .await
        .unwrap();

    // queue excludes the in-progress job; by-bay excludes appointments
    let queue = garage.queue_for_bay(BayId(4)).await.unwrap();
    let queue_ids: Vec<_> = queue.iter().map(|j| j.id.clone()).collect();
    assert!(queue_ids.contains(&queued.id));
    assert!(queue_ids.contains(&held.id));
    assert!(!queue_ids.contains(&active.id));

    let current = garage.active_job(BayId(4)).await.unwrap().unwrap();
    assert_eq!(current.id, active.id);

    // appointments come back soonest first
    let scheduled = garage.scheduled_jobs().await.unwrap();
    assert_eq!(scheduled.len(), 2);
    assert_eq!(scheduled[0].license_plate, "SLC-005");
    assert_eq!(scheduled[1].license_plate, "SLC-004");

    // customer history is newest first
    let history = garage.jobs_by_customer("u-9").await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].license_plate, "SLC-005");

    let stats = garage.stats().await.unwrap();
    assert_eq!(stats.scheduled, 2);
    assert_eq!(stats.on_hold, 1);
    // demo seed contributes one active job alongside SLC-003
    assert_eq!(stats.active, 2);

    garage.stop();
}

#[tokio::test]
async fn slot_search_runs_over_the_cached_jobs() {
    let garage = Garage::start(local_config()).await.unwrap();

    // the demo seed only occupies bay 1, so the merged set is full
    let today = Utc::now().with_timezone(&chrono::Local).date_naive();
    let slots = garage.find_available_slots(today, 1.0).await.unwrap();
    assert_eq!(slots.len(), 19);

    let none = garage.find_available_slots(today, 0.0).await.unwrap();
    assert!(none.is_empty());

    garage.stop();
}

#[tokio::test]
async fn cancellation_is_a_status_not_a_removal() {
    let garage = Garage::start(local_config()).await.unwrap();
    let job = garage.add_job(draft("CAN-001")).await.unwrap();

    garage
        .update_job_status(job.id.clone(), JobStatus::Cancelled, None)
        .await
        .unwrap();

    let jobs = garage.all_jobs().await.unwrap();
    let cancelled = jobs.iter().find(|j| j.id == job.id).unwrap();
    assert_eq!(cancelled.status, JobStatus::Cancelled);
    assert!(cancelled.status.is_terminal());

    garage.stop();
}

#[tokio::test]
async fn unknown_job_ids_are_a_caller_error() {
    let garage = Garage::start(local_config()).await.unwrap();
    let result = garage
        .update_job_status("no-such-job".into(), JobStatus::Completed, None)
        .await;
    assert!(matches!(
        result,
        Err(coordinator::GarageError::JobNotFound(_))
    ));
    garage.stop();
}

#[tokio::test]
async fn detail_edits_reassign_bays_without_lifecycle_checks() {
    let garage = Garage::start(local_config()).await.unwrap();
    let job = garage.add_job(draft("MOV-001").with_bay(BayId(1))).await.unwrap();

    let moved = garage
        .update_job_details(job.id.clone(), JobPatch::reassign_bay(BayId(5)))
        .await
        .unwrap();
    assert_eq!(moved.bay_id, Some(BayId(5)));

    let in_new_bay = garage.jobs_by_bay(BayId(5)).await.unwrap();
    assert!(in_new_bay.iter().any(|j| j.id == job.id));

    garage.stop();
}

#[tokio::test]
async fn sibling_coordinators_converge_through_the_shared_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let storage = || StorageConfig::filesystem(dir.path());
    let fast = Duration::from_millis(100);

    let first = Garage::start(
        GarageConfig::local_only(storage()).with_watch_interval(fast),
    )
    .await
    .unwrap();
    let second = Garage::start(
        GarageConfig::local_only(storage()).with_watch_interval(fast),
    )
    .await
    .unwrap();

    // the first coordinator seeded; the second adopted its snapshot
    assert_eq!(second.all_jobs().await.unwrap().len(), 2);

    let mut second_changes = second.subscribe_changes();
    let job = first.add_job(draft("SIB-001")).await.unwrap();

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let jobs = second.all_jobs().await.unwrap();
        if jobs.iter().any(|j| j.id == job.id) {
            break;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "sibling never observed the write"
        );
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    assert!(second_changes.try_recv().is_ok(), "reload published a change");

    first.stop();
    second.stop();
}
