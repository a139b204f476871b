//! First-run demo data for offline operation.

use chrono::{Duration, Utc};
use garage_core::{BayId, Job, JobDraft, JobId, JobStatus, lifecycle};

/// Jobs seeded when the local snapshot is entirely empty on the first
/// fallback, so a fresh offline install has something on the board.
pub fn demo_jobs() -> Vec<Job> {
    let mut active = JobDraft::new(
        "Demo Customer",
        "Tesla Model 3",
        "DEMO-01",
        "Tire Rotation",
        1.0,
    )
    .with_bay(BayId(1))
    .into_job(JobId::from("demo-1"));
    active.created_at = Utc::now() - Duration::minutes(2);
    let mut active = lifecycle::transition(&active, JobStatus::InProgress, None).job;
    active.started_at = Some(Utc::now() - Duration::minutes(1));

    let queued = JobDraft::new(
        "Manager Test",
        "Ford F-150",
        "DEMO-02",
        "Oil Change",
        1.5,
    )
    .with_bay(BayId(1))
    .into_job(JobId::from("demo-2"));

    vec![queued, active]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_one_active_and_one_queued_job() {
        let jobs = demo_jobs();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].status, JobStatus::Queued);
        assert_eq!(jobs[1].status, JobStatus::InProgress);
        assert!(jobs[1].started_at.is_some());
        assert!(jobs.iter().all(|j| j.bay_id == Some(BayId(1))));
    }
}
