//! Slot availability search over bay commitments.
//!
//! Pure functions: the caller supplies the full job set and gets back
//! the merged list of start instants at which at least one bay could
//! take a job of the requested duration.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::bay::{BayId, TOTAL_BAYS};
use crate::job::{Job, JobStatus};

/// Shop opens at 08:00 local time.
pub const SHOP_OPEN_HOUR: u32 = 8;
/// Shop closes at 18:00 local time.
pub const SHOP_CLOSE_HOUR: u32 = 18;
/// Candidate start times are walked at this granularity.
pub const SLOT_STEP_MINUTES: i64 = 30;
/// Turnover time reserved after each job before the bay can take the
/// next one.
pub const TURNOVER_BUFFER_HOURS: f64 = 0.25;

/// Find every instant on `date` at which a job of `duration_hours`
/// could start in at least one bay.
///
/// Candidates run from opening hour through closing hour minus the
/// duration, in [`SLOT_STEP_MINUTES`] steps. A candidate is free for a
/// bay when `[start, start + duration + buffer)` does not overlap any
/// of that bay's commitments for the day. The result is the union
/// across bays, ascending and deduplicated.
///
/// A non-positive duration yields an empty result.
pub fn find_available_slots(
    date: NaiveDate,
    duration_hours: f64,
    jobs: &[Job],
) -> Vec<DateTime<Utc>> {
    if duration_hours <= 0.0 {
        return Vec::new();
    }

    let day_jobs: Vec<&Job> = jobs.iter().filter(|job| blocks_date(job, date)).collect();

    let duration_min = minutes(duration_hours);
    let buffer_min = minutes(TURNOVER_BUFFER_HOURS);
    let open_min = i64::from(SHOP_OPEN_HOUR) * 60;
    let close_min = i64::from(SHOP_CLOSE_HOUR) * 60;

    let mut slots = BTreeSet::new();

    for bay in 1..=TOTAL_BAYS {
        let commitments: Vec<(DateTime<Utc>, DateTime<Utc>)> = day_jobs
            .iter()
            .copied()
            .filter(|job| job.bay_id == Some(BayId(bay)))
            .filter_map(commitment_window)
            .collect();

        let mut start_min = open_min;
        while start_min <= close_min - duration_min {
            if let Some(slot_start) = local_instant(date, start_min) {
                let slot_end = slot_start + Duration::minutes(duration_min + buffer_min);
                let blocked = commitments
                    .iter()
                    .any(|&(cs, ce)| cs < slot_end && slot_start < ce);
                if !blocked {
                    slots.insert(slot_start);
                }
            }
            start_min += SLOT_STEP_MINUTES;
        }
    }

    slots.into_iter().collect()
}

/// Whether a job occupies a bay on the given local calendar date.
///
/// Appointments count by their scheduled time unless cancelled;
/// dispatched jobs count by their actual start time. A job with
/// neither instant cannot block a slot.
fn blocks_date(job: &Job, date: NaiveDate) -> bool {
    if let Some(scheduled) = job.scheduled_time {
        return job.status != JobStatus::Cancelled
            && scheduled.with_timezone(&Local).date_naive() == date;
    }
    if let Some(started) = job.started_at {
        return started.with_timezone(&Local).date_naive() == date;
    }
    false
}

/// The half-open interval a job occupies in its bay.
fn commitment_window(job: &Job) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = job.scheduled_time.or(job.started_at)?;
    Some((start, start + Duration::minutes(minutes(job.estimated_duration_hours))))
}

/// Build the instant for a local wall-clock offset on `date`.
///
/// Constructed from local calendar fields so the slot lands on the
/// requested day regardless of the offset between local time and UTC.
/// A candidate falling in a DST gap is skipped.
fn local_instant(date: NaiveDate, minutes_from_midnight: i64) -> Option<DateTime<Utc>> {
    let time = NaiveTime::from_num_seconds_from_midnight_opt(
        u32::try_from(minutes_from_midnight * 60).ok()?,
        0,
    )?;
    Local
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

fn minutes(hours: f64) -> i64 {
    (hours * 60.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{JobDraft, JobId};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, 15).unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(2026, 7, 15, hour, minute, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn job_in_bay(bay: u8, scheduled: DateTime<Utc>, duration_hours: f64) -> Job {
        let mut job = JobDraft::new("Owner", "Car", "PLT-000", "Service", duration_hours)
            .with_bay(BayId(bay))
            .scheduled_for(scheduled)
            .into_job(JobId::local());
        job.status = JobStatus::Scheduled;
        job
    }

    #[test]
    fn empty_day_offers_every_half_hour_through_close_minus_duration() {
        let slots = find_available_slots(day(), 1.0, &[]);
        assert_eq!(slots.len(), 19);
        assert_eq!(slots[0], at(8, 0));
        assert_eq!(slots[1], at(8, 30));
        assert_eq!(*slots.last().unwrap(), at(17, 0));
    }

    #[test]
    fn one_busy_bay_among_five_does_not_shrink_the_merged_set() {
        let jobs = vec![job_in_bay(1, at(10, 0), 1.0)];
        let slots = find_available_slots(day(), 1.0, &jobs);
        // bays 2..=5 stay free all day, so the union is unaffected
        assert_eq!(slots.len(), 19);
        assert!(slots.contains(&at(10, 0)));
    }

    #[test]
    fn a_commitment_in_every_bay_blocks_the_overlapping_candidates() {
        let jobs: Vec<Job> = (1..=TOTAL_BAYS)
            .map(|bay| job_in_bay(bay, at(10, 0), 1.0))
            .collect();
        let slots = find_available_slots(day(), 1.0, &jobs);
        // 1h + 0.25h buffer: candidates 09:00 through 10:30 collide
        // with [10:00, 11:00) in every bay
        for blocked in [at(9, 0), at(9, 30), at(10, 0), at(10, 30)] {
            assert!(!slots.contains(&blocked), "{blocked} should be blocked");
        }
        assert!(slots.contains(&at(8, 30)));
        assert!(slots.contains(&at(11, 0)));
        assert_eq!(slots.len(), 15);
    }

    #[test]
    fn returned_slots_never_overlap_a_same_bay_commitment() {
        let jobs: Vec<Job> = (1..=TOTAL_BAYS)
            .flat_map(|bay| {
                vec![
                    job_in_bay(bay, at(9, 0), 2.0),
                    job_in_bay(bay, at(14, 30), 1.5),
                ]
            })
            .collect();
        for duration in [0.5, 1.0, 2.5] {
            let occupied = duration + TURNOVER_BUFFER_HOURS;
            for slot in find_available_slots(day(), duration, &jobs) {
                let slot_end = slot + Duration::minutes((occupied * 60.0) as i64);
                for job in &jobs {
                    let start = job.scheduled_time.unwrap();
                    let end = start + Duration::minutes((job.estimated_duration_hours * 60.0) as i64);
                    assert!(
                        !(start < slot_end && slot < end),
                        "slot {slot} overlaps commitment starting {start}"
                    );
                }
            }
        }
    }

    #[test]
    fn cancelled_appointments_do_not_block() {
        let mut cancelled = job_in_bay(1, at(10, 0), 8.0);
        cancelled.status = JobStatus::Cancelled;
        let jobs: Vec<Job> = (1..=TOTAL_BAYS)
            .map(|bay| {
                let mut job = cancelled.clone();
                job.bay_id = Some(BayId(bay));
                job
            })
            .collect();
        assert_eq!(find_available_slots(day(), 1.0, &jobs).len(), 19);
    }

    #[test]
    fn dispatched_jobs_block_by_actual_start_time() {
        let mut job = JobDraft::new("Owner", "Car", "PLT-001", "Service", 1.0)
            .with_bay(BayId(2))
            .into_job(JobId::local());
        job.status = JobStatus::InProgress;
        job.started_at = Some(at(10, 0));
        let jobs: Vec<Job> = (1..=TOTAL_BAYS)
            .map(|bay| {
                let mut j = job.clone();
                j.bay_id = Some(BayId(bay));
                j
            })
            .collect();
        let slots = find_available_slots(day(), 1.0, &jobs);
        assert!(!slots.contains(&at(10, 0)));
    }

    #[test]
    fn unanchored_jobs_never_block() {
        // queued, no schedule, not started yet
        let job = JobDraft::new("Owner", "Car", "PLT-002", "Service", 4.0)
            .with_bay(BayId(1))
            .into_job(JobId::local());
        let jobs: Vec<Job> = (1..=TOTAL_BAYS)
            .map(|bay| {
                let mut j = job.clone();
                j.bay_id = Some(BayId(bay));
                j
            })
            .collect();
        assert_eq!(find_available_slots(day(), 1.0, &jobs).len(), 19);
    }

    #[test]
    fn non_positive_duration_yields_nothing() {
        assert!(find_available_slots(day(), 0.0, &[]).is_empty());
        assert!(find_available_slots(day(), -1.0, &[]).is_empty());
    }

    #[test]
    fn long_durations_shrink_the_candidate_range() {
        let slots = find_available_slots(day(), 10.0, &[]);
        assert_eq!(slots, vec![at(8, 0)]);
        assert!(find_available_slots(day(), 10.5, &[]).is_empty());
    }
}
