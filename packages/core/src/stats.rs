//! Aggregate counts over the job set.

use serde::{Deserialize, Serialize};

use crate::job::{Job, JobStatus};

/// Per-status counts across the whole shop, computed on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarageStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    pub queued: usize,
    pub on_hold: usize,
    pub scheduled: usize,
}

impl GarageStats {
    pub fn from_jobs(jobs: &[Job]) -> Self {
        let mut stats = Self {
            total: jobs.len(),
            ..Self::default()
        };
        for job in jobs {
            match job.status {
                JobStatus::Completed => stats.completed += 1,
                JobStatus::InProgress => stats.active += 1,
                JobStatus::Queued => stats.queued += 1,
                JobStatus::OnHold => stats.on_hold += 1,
                JobStatus::Scheduled => stats.scheduled += 1,
                JobStatus::Cancelled => {}
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{JobDraft, JobId};
    use chrono::Utc;

    fn job_with_status(status: JobStatus) -> Job {
        let mut job = JobDraft::new("Owner", "Car", "PLT-000", "Service", 1.0)
            .into_job(JobId::local());
        job.status = status;
        job
    }

    #[test]
    fn counts_follow_statuses() {
        let jobs = vec![
            job_with_status(JobStatus::Queued),
            job_with_status(JobStatus::Queued),
            job_with_status(JobStatus::InProgress),
            job_with_status(JobStatus::OnHold),
            job_with_status(JobStatus::Completed),
            job_with_status(JobStatus::Cancelled),
            JobDraft::new("Owner", "Car", "PLT-001", "Service", 1.0)
                .scheduled_for(Utc::now())
                .into_job(JobId::local()),
        ];
        let stats = GarageStats::from_jobs(&jobs);
        assert_eq!(stats.total, 7);
        assert_eq!(stats.queued, 2);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.on_hold, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.scheduled, 1);
    }

    #[test]
    fn empty_set_is_all_zeroes() {
        assert_eq!(GarageStats::from_jobs(&[]), GarageStats::default());
    }
}
